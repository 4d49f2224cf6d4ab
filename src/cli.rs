//! Command-line parsing and validation.

use crate::config::{self, Command, OutputFormat, Parameters};
use latlonbox::CentroidMode;
use latlonbox::error::CliError;
use latlonbox::file_input::InputSource;
use std::collections::HashSet;

type CliResult<T> = Result<T, CliError>;

type ApplyFn = fn(Option<&str>, &mut Parameters) -> CliResult<()>;

enum OptKind {
    Value(ApplyFn),
    Flag(ApplyFn),
}

struct OptionSpec {
    name: &'static str,
    kind: OptKind,
}

const OPTION_SPECS: &[OptionSpec] = &[
    OptionSpec {
        name: "format",
        kind: OptKind::Value(|value, params| {
            let v = required_value("format", value)?;
            params.output.format = v.parse::<OutputFormat>().map_err(CliError::from)?;
            Ok(())
        }),
    },
    OptionSpec {
        name: "layouts",
        kind: OptKind::Value(|value, params| {
            let v = required_value("layouts", value)?;
            params.matching.layouts = config::parse_layouts(v).map_err(CliError::from)?;
            Ok(())
        }),
    },
    OptionSpec {
        name: "antimeridian",
        kind: OptKind::Flag(|_, params| {
            params.matching.centroid = CentroidMode::AntimeridianAware;
            Ok(())
        }),
    },
    OptionSpec {
        name: "headers",
        kind: OptKind::Flag(|_, params| {
            params.output.headers = true;
            Ok(())
        }),
    },
    OptionSpec {
        name: "no-headers",
        kind: OptKind::Flag(|_, params| {
            params.output.headers = false;
            Ok(())
        }),
    },
    OptionSpec {
        name: "show-inputs",
        kind: OptKind::Flag(|_, params| {
            params.output.show_inputs = Some(true);
            Ok(())
        }),
    },
    OptionSpec {
        name: "no-show-inputs",
        kind: OptKind::Flag(|_, params| {
            params.output.show_inputs = Some(false);
            Ok(())
        }),
    },
    OptionSpec {
        name: "show-unmatched",
        kind: OptKind::Flag(|_, params| {
            params.output.show_unmatched = true;
            Ok(())
        }),
    },
    OptionSpec {
        name: "summary",
        kind: OptKind::Flag(|_, params| {
            params.summary = true;
            Ok(())
        }),
    },
    OptionSpec {
        name: "perf",
        kind: OptKind::Flag(|_, params| {
            params.perf = true;
            Ok(())
        }),
    },
    OptionSpec {
        name: "help",
        kind: OptKind::Flag(|_, _| Err(CliError::Exit(get_help_text()))),
    },
    OptionSpec {
        name: "version",
        kind: OptKind::Flag(|_, _| Err(CliError::Exit(get_version_text()))),
    },
];

pub fn parse_cli(args: Vec<String>) -> CliResult<(InputSource, Command, Parameters)> {
    if args.len() < 2 {
        return Err(CliError::Exit(
            "Usage: latlonbox [OPTIONS] <text|@file|@-> <bbox|points>".to_string(),
        ));
    }

    let mut params = Parameters::default();
    let mut positional = Vec::new();
    let mut applied_options: HashSet<&'static str> = HashSet::new();

    for arg in args.into_iter().skip(1) {
        if let Some(stripped) = arg.strip_prefix("--") {
            let (name, value) = stripped
                .split_once('=')
                .map(|(n, v)| (n, Some(v)))
                .unwrap_or((stripped, None));
            apply_option(name, value, &mut params, &mut applied_options)?;
        } else {
            positional.push(arg);
        }
    }

    if let Some(first) = positional.first()
        && first == "help"
    {
        let message = positional
            .get(1)
            .map(|command| get_command_help(command))
            .unwrap_or_else(get_help_text);
        return Err(CliError::Exit(message));
    }

    let (source, command) = parse_positional_args(&positional)?;

    validate_command_options(command, &applied_options)?;

    if params.output.show_inputs.is_none() {
        params.output.show_inputs = Some(should_auto_show_inputs(&source));
    }

    Ok((source, command, params))
}

fn apply_option(
    name: &str,
    value: Option<&str>,
    params: &mut Parameters,
    applied: &mut HashSet<&'static str>,
) -> CliResult<()> {
    let Some(spec) = OPTION_SPECS.iter().find(|s| s.name == name) else {
        return Err(format!("Unknown option: --{}", name).into());
    };

    match spec.kind {
        OptKind::Value(handler) => {
            let val = required_value(spec.name, value)?;
            handler(Some(val), params)?;
        }
        OptKind::Flag(handler) => {
            if value.is_some() {
                return Err(format!("Option --{} does not take a value", spec.name).into());
            }
            handler(None, params)?;
        }
    }

    applied.insert(spec.name);
    Ok(())
}

fn required_value<'a>(flag: &'static str, value: Option<&'a str>) -> CliResult<&'a str> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| CliError::from(format!("Option --{} requires a value", flag)))
}

fn parse_positional_args(positional_args: &[String]) -> CliResult<(InputSource, Command)> {
    match positional_args {
        [] => Err("Need an input and a command (bbox or points)".into()),
        [_] => Err("No command found: expected bbox or points after the input".into()),
        [input, command] => {
            let command = match command.as_str() {
                "bbox" => Command::BBox,
                "points" => Command::Points,
                other => return Err(format!("Unknown command: {}", other).into()),
            };
            if input.is_empty() || input == "@" {
                return Err("Input must be text, @file, or @- for stdin".into());
            }
            Ok((InputSource::from_arg(input), command))
        }
        _ => Err("Too many arguments: quote the input text as a single argument".into()),
    }
}

fn should_auto_show_inputs(source: &InputSource) -> bool {
    !matches!(source, InputSource::Text(_))
}

fn validate_command_options(command: Command, applied: &HashSet<&'static str>) -> CliResult<()> {
    if command == Command::Points {
        for name in ["layouts", "antimeridian", "show-unmatched"] {
            if applied.contains(name) {
                return Err(format!("Option --{} not valid for points command", name).into());
            }
        }
    }
    Ok(())
}

fn get_version_text() -> String {
    format!(
        "latlonbox {}\n Build: {} ({})\n Built: {}\n Features: {}",
        env!("CARGO_PKG_VERSION"),
        env!("BUILD_PROFILE"),
        env!("BUILD_TARGET"),
        env!("BUILD_DATE"),
        env!("BUILD_FEATURES")
    )
}

fn get_help_text() -> String {
    let defaults = Parameters::default();
    let formats = OutputFormat::all().join(", ");
    format!(
        r#"latlonbox {}
Extracts geographic bounding boxes and coordinates from free text.

Usage:
  latlonbox [OPTIONS] <text> <bbox|points>
  latlonbox [OPTIONS] @lines.txt <bbox|points>
  latlonbox [OPTIONS] @- <bbox|points>

Examples:
  latlonbox "36°31′ to 37°20′N, 108°52′ to 109°26′E" bbox
  latlonbox --format=csv --summary @abstracts.txt bbox
  latlonbox "Site at 36°31′N 108°52′W" points
  cat abstracts.txt | latlonbox --format=json @- bbox

Arguments:
  <input>            Text to search, or a file with one description per line.
                       "36°N to 37°N, ..."  literal text (newlines split lines)
                       @lines.txt           file, read line by line
                       @-                   stdin
                     Blank lines and lines starting with # are ignored.

Options:
  --format=<format>     Output format: {}. Default: {}
  --[no-]headers        Include headers in CSV output. Default: {}
  --[no-]show-inputs    Include the source line in output. Auto-enabled for
                        file and stdin input.
  --summary             Print the match rate to stderr.
  --perf                Print performance statistics to stderr.
  --help                Show this help message and exit.
  --version             Print version information and exit.

Commands:
  bbox                  Extract one bounding box per line.
  points                Extract every lat/lon point in each line.

Run 'latlonbox help <command>' for command-specific options.
"#,
        env!("CARGO_PKG_VERSION"),
        formats,
        defaults.output.format.as_str(),
        defaults.output.headers
    )
}

fn get_command_help(command: &str) -> String {
    match command {
        "bbox" => r#"Usage:
  latlonbox [OPTIONS] <text|@file|@-> bbox

Extracts a bounding box such as "36°31′ to 37°20′N, 108°52′ to 109°26′E"
and reports both latitudes, both longitudes, and the centroid in signed
decimal degrees. Layouts are tried in order; the first match wins:
  A   latitude range, then longitude range
  B   longitude range, then latitude range
  C   two corners, each "lat, lon"

A missing direction is taken from the other value of the same pair. When
neither value of a pair has one, the box is assumed north/east and the
row is flagged.

Options:
  --layouts=<list>      Layouts to try, in order. Default: A,B,C
  --antimeridian        Average longitudes across ±180° when the box spans
                        the antimeridian.
  --show-unmatched      Emit a row for lines without a match.

Examples:
  latlonbox "40°41′–40°46′N, 98°29′–98°50′W" bbox
  latlonbox --layouts=C "36°N, 108°W and 37°N, 109°W" bbox
  latlonbox --format=csv --show-unmatched @abstracts.txt bbox
"#
        .to_string(),
        "points" => r#"Usage:
  latlonbox [OPTIONS] <text|@file|@-> points

Extracts every single point such as "36°31′N 108°52′W" or "N 36.5, W 108.2".
Both latitude and longitude need a direction. Values are rounded to 6
decimals when seconds are given, 3 with minutes, and otherwise to the
precision of the degrees.

Examples:
  latlonbox "Site at 36°31′N 108°52′W" points
  latlonbox --format=json @abstracts.txt points
"#
        .to_string(),
        _ => format!(
            "Unknown command: {}\n\nRun 'latlonbox --help' for usage.",
            command
        ),
    }
}
