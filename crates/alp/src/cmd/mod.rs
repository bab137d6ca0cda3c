use clap::{Args, Subcommand};

use crate::exit::{CliError, CliResult, USAGE};

pub mod compose;
pub mod decode;
pub mod response_length;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode a hex-encoded command into its actions.
    Decode(DecodeArgs),
    /// Compose a command from file operations and print it as hex.
    Compose(ComposeArgs),
    /// Print the response length a responder would produce for a command.
    ResponseLength(ResponseLengthArgs),
}

pub fn run(command: Command) -> CliResult<i32> {
    match command {
        Command::Decode(args) => decode::run(args),
        Command::Compose(args) => compose::run(args),
        Command::ResponseLength(args) => response_length::run(args),
    }
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Hex-encoded command bytes.
    pub hex: String,
}

#[derive(Args, Debug)]
pub struct ComposeArgs {
    /// Tag id correlating the command with its later response.
    #[arg(long)]
    pub tag: Option<u8>,

    /// Ask the responder to confirm completion of the tagged batch.
    #[arg(long, requires = "tag")]
    pub respond_when_completed: bool,

    #[command(subcommand)]
    pub op: ComposeOp,
}

#[derive(Subcommand, Debug)]
pub enum ComposeOp {
    /// Append a read-file-data action.
    ReadFile {
        #[arg(long)]
        file_id: u8,
        #[arg(long, default_value = "0")]
        offset: u32,
        #[arg(long)]
        length: u32,
        /// Request a return-file-data response.
        #[arg(long)]
        response: bool,
    },
    /// Append a write-file-data action.
    WriteFile {
        #[arg(long)]
        file_id: u8,
        #[arg(long, default_value = "0")]
        offset: u32,
        /// Hex-encoded data bytes to write.
        #[arg(long)]
        data: String,
        #[arg(long)]
        response: bool,
    },
}

#[derive(Args, Debug)]
pub struct ResponseLengthArgs {
    /// Hex-encoded command bytes.
    pub hex: String,
}

pub fn parse_hex(input: &str) -> CliResult<Vec<u8>> {
    let input = input.trim();
    if input.len() % 2 != 0 {
        return Err(CliError::new(USAGE, "hex input must have even length"));
    }
    (0..input.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&input[i..i + 2], 16)
                .map_err(|_| CliError::new(USAGE, format!("invalid hex at offset {i}")))
        })
        .collect()
}

pub fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|byte| format!("{byte:02x}")).collect()
}
