use alp_codec::expected_response_length;

use crate::cmd::{parse_hex, ResponseLengthArgs};
use crate::exit::{codec_error, CliResult, SUCCESS};

pub fn run(args: ResponseLengthArgs) -> CliResult<i32> {
    let bytes = parse_hex(&args.hex)?;
    let length = expected_response_length(&bytes)
        .map_err(|err| codec_error("scanning command", err))?;
    println!("{length}");
    Ok(SUCCESS)
}
