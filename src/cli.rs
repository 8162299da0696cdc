//! Command-line flags
//!
//! Flags only override configuration values; everything else comes from the
//! config file and environment (see `config`).

use thiserror::Error;

/// Parsed command line
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub port: Option<u16>,
    pub host: Option<String>,
    pub dir: Option<String>,
    pub template: Option<String>,
    /// Config file (without extension); `autoindex` when unset
    pub config: Option<String>,
    /// Print the listing of the root directory and exit
    pub print: bool,
    pub help: bool,
    pub version: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CliError {
    #[error("missing value for {0}")]
    MissingValue(String),
    #[error("invalid port '{0}'")]
    InvalidPort(String),
    #[error("unknown argument '{0}' (see --help)")]
    Unknown(String),
}

/// Parse arguments (program name already skipped)
///
/// Accepts both `--flag value` and `--flag=value`.
pub fn parse_args<I>(args: I) -> Result<CliArgs, CliError>
where
    I: IntoIterator<Item = String>,
{
    let mut parsed = CliArgs::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) if flag.starts_with('-') => {
                (flag.to_string(), Some(value.to_string()))
            }
            _ => (arg, None),
        };

        match flag.as_str() {
            "--port" | "-p" => {
                let raw = take_value(&flag, inline, &mut args)?;
                let port = raw.parse::<u16>().map_err(|_| CliError::InvalidPort(raw))?;
                parsed.port = Some(port);
            }
            "--host" => parsed.host = Some(take_value(&flag, inline, &mut args)?),
            "--dir" | "-d" => parsed.dir = Some(take_value(&flag, inline, &mut args)?),
            "--template" => parsed.template = Some(take_value(&flag, inline, &mut args)?),
            "--config" | "-c" => parsed.config = Some(take_value(&flag, inline, &mut args)?),
            "--print" => parsed.print = true,
            "--help" | "-h" => parsed.help = true,
            "--version" | "-V" => parsed.version = true,
            _ => return Err(CliError::Unknown(flag)),
        }
    }

    Ok(parsed)
}

fn take_value(
    flag: &str,
    inline: Option<String>,
    rest: &mut impl Iterator<Item = String>,
) -> Result<String, CliError> {
    inline
        .or_else(|| rest.next())
        .ok_or_else(|| CliError::MissingValue(flag.to_string()))
}

pub fn usage() -> String {
    format!(
        "{name} {version}
Serve a browsable listing of a directory over HTTP.

Usage: {name} [OPTIONS]

Options:
  -p, --port <PORT>       Port to run on [default: 3333]
      --host <ADDR>       Address to bind [default: 127.0.0.1]
  -d, --dir <DIR>         Directory to serve [default: .]
      --template <FILE>   Listing page template
  -c, --config <FILE>     Config file, extension optional [default: autoindex]
      --print             Print the listing of --dir and exit
  -h, --help              Print help
  -V, --version           Print version

Environment variables prefixed with AUTOINDEX_ override config file values,
e.g. AUTOINDEX_SERVER__PORT=8080 or AUTOINDEX_LISTING__SHOW_HIDDEN=true.
",
        name = env!("CARGO_PKG_NAME"),
        version = env!("CARGO_PKG_VERSION"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<CliArgs, CliError> {
        parse_args(args.iter().map(ToString::to_string))
    }

    #[test]
    fn test_no_arguments() {
        assert_eq!(parse(&[]).unwrap(), CliArgs::default());
    }

    #[test]
    fn test_port_and_dir() {
        let args = parse(&["--port", "8080", "--dir=/srv/files"]).unwrap();
        assert_eq!(args.port, Some(8080));
        assert_eq!(args.dir.as_deref(), Some("/srv/files"));
    }

    #[test]
    fn test_short_flags_and_switches() {
        let args = parse(&["-d", "pub", "-p=9000", "--print", "-c", "site"]).unwrap();
        assert_eq!(args.dir.as_deref(), Some("pub"));
        assert_eq!(args.port, Some(9000));
        assert_eq!(args.config.as_deref(), Some("site"));
        assert!(args.print);
        assert!(!args.help);
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            parse(&["--port", "http"]),
            Err(CliError::InvalidPort("http".to_string()))
        );
        assert_eq!(parse(&["--port", "70000"]), Err(CliError::InvalidPort("70000".to_string())));
        assert_eq!(parse(&["--dir"]), Err(CliError::MissingValue("--dir".to_string())));
        assert_eq!(parse(&["--verbose"]), Err(CliError::Unknown("--verbose".to_string())));
    }

    #[test]
    fn test_usage_mentions_defaults() {
        let text = usage();
        assert!(text.contains("[default: 3333]"));
        assert!(text.contains("--dir"));
    }
}
