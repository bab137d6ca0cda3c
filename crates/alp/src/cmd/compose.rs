use bytes::BytesMut;

use alp_codec::{
    append_read_file_data_action, append_tag_request_action, append_write_file_data_action,
};

use crate::cmd::{parse_hex, to_hex, ComposeArgs, ComposeOp};
use crate::exit::{codec_error, CliResult, SUCCESS};

pub fn run(args: ComposeArgs) -> CliResult<i32> {
    let mut command = BytesMut::new();
    if let Some(tag) = args.tag {
        append_tag_request_action(&mut command, tag, args.respond_when_completed)
            .map_err(|err| codec_error("composing tag request", err))?;
    }
    match args.op {
        ComposeOp::ReadFile {
            file_id,
            offset,
            length,
            response,
        } => {
            append_read_file_data_action(&mut command, file_id, offset, length, response, false)
                .map_err(|err| codec_error("composing read-file", err))?;
        }
        ComposeOp::WriteFile {
            file_id,
            offset,
            data,
            response,
        } => {
            let data = parse_hex(&data)?;
            append_write_file_data_action(&mut command, file_id, offset, &data, response, false)
                .map_err(|err| codec_error("composing write-file", err))?;
        }
    }
    println!("{}", to_hex(&command));
    Ok(SUCCESS)
}
