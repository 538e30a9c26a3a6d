use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "lazyrev", version, about = "Run custom version-control commands from a terminal UI")]
pub struct Args {
    /// Repository to operate in (defaults to the current directory)
    #[arg(short = 'R', long)]
    pub repository: Option<PathBuf>,

    /// Configuration file to use instead of the default location
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// VCS program receiving argument-form commands (overrides the config)
    #[arg(long)]
    pub program: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let args = Args::parse_from(["lazyrev", "-R", "/tmp/repo", "--program", "git"]);

        assert_eq!(args.repository, Some(PathBuf::from("/tmp/repo")));
        assert_eq!(args.program.as_deref(), Some("git"));
        assert!(args.config.is_none());
    }
}
