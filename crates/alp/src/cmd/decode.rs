use alp_codec::parse_action;

use crate::cmd::{parse_hex, DecodeArgs};
use crate::exit::{codec_error, CliResult, SUCCESS};

pub fn run(args: DecodeArgs) -> CliResult<i32> {
    let bytes = parse_hex(&args.hex)?;
    let mut src = bytes.as_slice();
    let mut index = 0usize;
    while !src.is_empty() {
        let action = parse_action(&mut src)
            .map_err(|err| codec_error(&format!("decoding action {index}"), err))?;
        println!("{index}: {action:?}");
        index += 1;
    }
    Ok(SUCCESS)
}
