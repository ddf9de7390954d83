// File: ./src/cli.rs
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "tickbox",
    version,
    about = "A date-scoped terminal to-do list with priorities, points and confetti"
)]
pub struct Cli {
    /// Keep tasks, config and logs under DIR
    #[arg(long = "data-dir", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_uses_platform_dirs() {
        let cli = Cli::try_parse_from(["tickbox"]).unwrap();
        assert!(cli.data_dir.is_none());
    }

    #[test]
    fn data_dir_takes_a_path() {
        let cli = Cli::try_parse_from(["tickbox", "--data-dir", "/tmp/tickbox"]).unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/tickbox")));
    }

    #[test]
    fn data_dir_without_value_is_rejected() {
        assert!(Cli::try_parse_from(["tickbox", "--data-dir"]).is_err());
    }

    #[test]
    fn unknown_argument_is_rejected() {
        let err = Cli::try_parse_from(["tickbox", "--bogus"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
        // clap exits non-zero for usage errors.
        assert_eq!(err.exit_code(), 2);
    }
}
