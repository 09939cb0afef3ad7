use clap::Parser;
use std::fs;
use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{anyhow, bail, Result};
use indicatif::ProgressBar;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use tabconv::cli::path_mapping::map_input_to_output;
use tabconv::cli::{self, Args, CliConfig, CliUtils, Commands};
use tabconv::conversion::batch::convert_batch_with;
use tabconv::conversion::stats::ConversionStatistics;
use tabconv::conversion::{ConversionEngine, ConvertedData};
use tabconv::error::{ConversionError, ConversionResult};
use tabconv::format::Format;
use tabconv::parser::directory::find_convertible_files;
use tabconv::parser::InputSource;

fn main() -> ExitCode {
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(&e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let cli = CliConfig::from_args(args)?;
    init_logging(cli.log_level());
    debug!(input = %cli.input_description(), output = %cli.output_description(), "starting");

    match &cli.args.command {
        Some(Commands::Serve {
            addr,
            max_upload_size,
        }) => {
            let config = cli.server_config(max_upload_size)?;
            tabconv::server::serve(addr, config)?;
            Ok(())
        }
        None if cli.is_validate_only() => handle_validation(&cli),
        None => handle_conversion(&cli),
    }
}

fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn report_error(error: &anyhow::Error) {
    match error.downcast_ref::<ConversionError>() {
        Some(conversion_error) => cli::handle_error(conversion_error),
        None => CliUtils::show_error(&format!("{:#}", error)),
    }
}

/// Input named on the command line
enum CliInput {
    Source(InputSource),
    Directory(PathBuf),
}

fn resolve_input(cli: &CliConfig) -> Result<CliInput> {
    if cli.args.stdin {
        return Ok(CliInput::Source(InputSource::Stdin));
    }

    let input = cli
        .args
        .input
        .as_ref()
        .ok_or_else(|| anyhow!("No input provided. Use --stdin or provide an input path"))?;
    let path = PathBuf::from(input);

    // Check if input looks like a JSON document (starts with { or [)
    let trimmed = input.trim();
    if (trimmed.starts_with('{') && trimmed.ends_with('}'))
        || (trimmed.starts_with('[') && trimmed.ends_with(']'))
    {
        Ok(CliInput::Source(InputSource::String(input.clone())))
    } else if path.is_file() {
        Ok(CliInput::Source(InputSource::File(path)))
    } else if path.is_dir() {
        Ok(CliInput::Directory(path))
    } else {
        Err(anyhow!("Input path does not exist: {}", input))
    }
}

/// Inline documents are JSON unless `--from` says otherwise
fn source_format(cli: &CliConfig, source: &InputSource) -> ConversionResult<Option<Format>> {
    let explicit = cli.input_format()?;
    Ok(match source {
        InputSource::String(_) => explicit.or(Some(Format::Json)),
        _ => explicit,
    })
}

fn handle_validation(cli: &CliConfig) -> Result<()> {
    let engine = ConversionEngine::new(cli.conversion_config.clone());

    match resolve_input(cli)? {
        CliInput::Source(source) => {
            let table = engine.read_source(&source, source_format(cli, &source)?)?;
            if !cli.is_quiet() {
                println!(
                    "✓ Valid input ({}): {} rows, {} columns",
                    source.description(),
                    table.row_count(),
                    table.column_count()
                );
            }
            Ok(())
        }
        CliInput::Directory(dir) => validate_directory(&engine, &dir, cli),
    }
}

fn validate_directory(engine: &ConversionEngine, dir: &Path, cli: &CliConfig) -> Result<()> {
    let input_format = cli.input_format()?;
    let files = find_convertible_files(dir, cli.args.recursive, input_format)
        .map_err(|e| ConversionError::io(e, Some(dir.to_path_buf())))?;

    let mut invalid = 0;
    for file in &files {
        let relative_path = file.strip_prefix(dir).unwrap_or(file);
        match engine.read_source(&InputSource::File(file.clone()), input_format) {
            Ok(table) => {
                if !cli.is_quiet() {
                    println!(
                        "✓ {}: {} rows, {} columns",
                        relative_path.display(),
                        table.row_count(),
                        table.column_count()
                    );
                }
            }
            Err(e) => {
                invalid += 1;
                eprintln!("✗ {}: {}", relative_path.display(), e.user_message());
            }
        }
    }

    if invalid > 0 {
        bail!("{} of {} files are invalid", invalid, files.len());
    }
    Ok(())
}

fn handle_conversion(cli: &CliConfig) -> Result<()> {
    let engine = ConversionEngine::new(cli.conversion_config.clone());

    match resolve_input(cli)? {
        CliInput::Source(source) => convert_source(&engine, &source, cli),
        CliInput::Directory(dir) => convert_directory(&engine, &dir, cli),
    }
}

fn convert_source(engine: &ConversionEngine, source: &InputSource, cli: &CliConfig) -> Result<()> {
    let input_format = source_format(cli, source)?;
    let output_format = cli.output_format()?;
    let data = engine.convert_source(source, input_format, output_format)?;

    match &cli.args.output {
        Some(output_path) => {
            write_file(output_path, &data)?;
            CliUtils::show_success(
                &format!("Converted to: {}", output_path.display()),
                cli.is_quiet(),
            );
        }
        None => write_stdout(&data)?,
    }

    if cli.want_stats() {
        output_statistics(&ConversionStatistics::for_conversion(&data.metadata), cli.is_quiet());
    }

    Ok(())
}

fn write_file(path: &Path, data: &ConvertedData) -> ConversionResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ConversionError::io(e, Some(parent.to_path_buf())))?;
    }
    fs::write(path, data.as_bytes()).map_err(|e| ConversionError::io(e, Some(path.to_path_buf())))
}

fn write_stdout(data: &ConvertedData) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    if data.format.is_binary() && stdout.is_terminal() {
        bail!(
            "Refusing to write binary {} output to a terminal; use -o FILE or redirect stdout",
            data.format.label()
        );
    }

    stdout.write_all(data.as_bytes())?;
    if !data.format.is_binary() && !data.as_bytes().ends_with(b"\n") {
        stdout.write_all(b"\n")?;
    }
    stdout.flush()?;
    Ok(())
}

fn convert_directory(engine: &ConversionEngine, input_dir: &Path, cli: &CliConfig) -> Result<()> {
    let output_dir = cli
        .args
        .output
        .as_ref()
        .ok_or_else(|| anyhow!("Output directory required for directory conversion"))?;
    let input_format = cli.input_format()?;
    let output_format = cli.directory_output_format()?;

    let files = find_convertible_files(input_dir, cli.args.recursive, input_format)
        .map_err(|e| ConversionError::io(e, Some(input_dir.to_path_buf())))?;

    if files.is_empty() {
        CliUtils::show_warning(
            &format!("No convertible files found in {}", input_dir.display()),
            cli.is_quiet(),
        );
        return Ok(());
    }

    fs::create_dir_all(output_dir)
        .map_err(|e| ConversionError::io(e, Some(output_dir.clone())))?;

    let progress = (!cli.is_quiet()).then(|| CliUtils::create_progress_bar(files.len() as u64));
    let total = files.len();
    let sources = files.into_iter().map(InputSource::File).collect();

    let deliver = |source: &InputSource, result: ConversionResult<ConvertedData>| {
        let InputSource::File(file) = source else {
            return result.map(|data| data.metadata);
        };
        let relative_path = file.strip_prefix(input_dir).unwrap_or(file);
        if let Some(pb) = &progress {
            pb.set_message(relative_path.display().to_string());
        }

        let output_file =
            map_input_to_output(input_dir, file, output_dir, output_format.extension());
        let result = result.and_then(|data| write_file(&output_file, &data).map(|_| data.metadata));

        match &result {
            Ok(_) => {
                debug!(input = %file.display(), output = %output_file.display(), "converted file")
            }
            Err(e) => report_file_error(
                progress.as_ref(),
                &format!("✗ Error converting {}: {}", relative_path.display(), e.user_message()),
            ),
        }
        if let Some(pb) = &progress {
            pb.inc(1);
        }
        result
    };

    let outcome = match convert_batch_with(
        engine,
        sources,
        input_format,
        output_format,
        cli.continue_on_error(),
        deliver,
    ) {
        Ok(outcome) => outcome,
        Err(_) => {
            if let Some(pb) = &progress {
                pb.abandon();
            }
            bail!("Aborting due to conversion error");
        }
    };
    let stats = outcome.statistics();

    if let Some(pb) = &progress {
        pb.finish_and_clear();
    }

    if cli.want_stats() {
        output_statistics(&stats, cli.is_quiet());
    }

    if !outcome.is_success() {
        bail!("{} of {} files failed to convert", outcome.failed.len(), total);
    }

    CliUtils::show_success(
        &format!(
            "Converted {} files into {}",
            stats.file_count,
            output_dir.display()
        ),
        cli.is_quiet(),
    );
    Ok(())
}

fn report_file_error(progress: Option<&ProgressBar>, message: &str) {
    match progress {
        Some(pb) if !pb.is_hidden() => pb.println(message),
        _ => eprintln!("{}", message),
    }
}

fn output_statistics(stats: &ConversionStatistics, quiet: bool) {
    if quiet {
        return;
    }

    eprintln!("\nConversion Statistics:");
    eprintln!("Files: {}", stats.file_count);
    if stats.failed_count > 0 {
        eprintln!("Failed: {}", stats.failed_count);
    }
    eprintln!("Rows: {}", stats.row_count);
    eprintln!(
        "Input size: {}",
        CliUtils::format_file_size(stats.input_size_bytes)
    );
    eprintln!(
        "Output size: {}",
        CliUtils::format_file_size(stats.output_size_bytes)
    );
    eprintln!(
        "Processing time: {}",
        CliUtils::format_duration(std::time::Duration::from_millis(stats.processing_time_ms))
    );
    if stats.throughput_bytes_per_sec > 0.0 {
        eprintln!(
            "Throughput: {}/s",
            CliUtils::format_file_size(stats.throughput_bytes_per_sec as u64)
        );
    }
}
