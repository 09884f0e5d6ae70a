use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Clone, Debug, Parser)]
#[command(name = "zipgate", version = env!("CARGO_PKG_VERSION"), about, long_about = None, propagate_version = true)]
pub struct App {
    #[command(flatten)]
    pub opts: GlobalOpts,
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    #[command(alias = "ext", name = "extensions", about = "Accept every entry with an allow-listed extension")]
    Extensions(ArchiveArg),
    #[command(alias = "n", name = "names", about = "Accept the named entries")]
    Names(NamesArg),
    #[command(name = "all", about = "Extract everything into the destination, unvalidated")]
    All(ArchiveArg),
    #[command(alias = "ls", name = "list", about = "List archive entries")]
    List(ArchiveArg),
}

#[derive(Clone, Debug, Args)]
pub struct ArchiveArg {
    /// Zip file, relative to the base directory
    pub archive: PathBuf,
}

#[derive(Clone, Debug, Args)]
pub struct NamesArg {
    /// Zip file, relative to the base directory
    pub archive: PathBuf,
    /// Entry paths, or bare file names unless --no-greedy is given
    #[arg(required = true)]
    pub names: Vec<String>,
}

/// Options shared by every subcommand. Each one overrides the config file.
#[derive(Clone, Debug, Default, Args)]
pub struct GlobalOpts {
    /// TOML file with [extract], [cleanup] and [allow] sections
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory relative paths are resolved against
    #[arg(long, global = true, value_name = "DIR")]
    pub base: Option<PathBuf>,

    /// Where accepted files end up
    #[arg(long, global = true, value_name = "DIR")]
    pub dest: Option<PathBuf>,

    /// Working directory for extracted, not yet validated files
    #[arg(long, global = true, value_name = "DIR")]
    pub staging: Option<PathBuf>,

    /// Match requested names against full entry paths only
    #[arg(long, global = true)]
    pub no_greedy: bool,

    /// Put every accepted file directly in the destination
    #[arg(long, global = true)]
    pub flatten: bool,

    /// Append a timestamp suffix to accepted file names
    #[arg(long, global = true)]
    pub rename: bool,

    /// Fixed suffix for accepted file names, implies --rename
    #[arg(long, global = true)]
    pub suffix: Option<String>,

    /// Text placed between a file stem and its suffix
    #[arg(long, global = true)]
    pub separator: Option<String>,

    /// Record the SHA-256 of every accepted file
    #[arg(long, global = true)]
    pub sha256: bool,

    /// Delete the zip file when done
    #[arg(long, global = true)]
    pub remove_zip: bool,

    /// Leave the staging directory on disk when done
    #[arg(long, global = true)]
    pub keep_staging: bool,

    /// Accepted extension, optionally with its mime type; repeatable
    #[arg(long = "allow", global = true, value_name = "EXT[=MIME]")]
    pub allow: Vec<String>,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_is_well_formed() {
        App::command().debug_assert();
    }

    #[test]
    fn global_options_after_subcommand() {
        let app = App::try_parse_from([
            "zipgate",
            "names",
            "upload.zip",
            "b.txt",
            "a/c.txt",
            "--no-greedy",
            "--allow",
            "txt",
            "--allow",
            "bin=application/octet-stream",
        ])
        .unwrap();

        assert!(app.opts.no_greedy);
        assert_eq!(app.opts.allow, ["txt", "bin=application/octet-stream"]);
        match app.cmd {
            Commands::Names(arg) => {
                assert_eq!(arg.archive, PathBuf::from("upload.zip"));
                assert_eq!(arg.names, ["b.txt", "a/c.txt"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn names_requires_at_least_one_name() {
        assert!(App::try_parse_from(["zipgate", "names", "upload.zip"]).is_err());
    }
}
