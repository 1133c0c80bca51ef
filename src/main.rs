use clap::Parser;
use std::io::{self, BufRead, Write};
use student_records::app::{render_summary, Prompter};
use student_records::utils::logger::{self, LogFormat};
use student_records::utils::validation::Validate;
use student_records::{CliConfig, ExportEngine, OutputSettings, Result, StudentData, StudentFile};

fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    let log_format = if config.log_json {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };
    logger::init_logger(log_format, config.verbose);

    tracing::info!("Starting student-records CLI");
    tracing::debug!("CLI config: {:?}", config);

    match run(&config) {
        Ok(true) => {}
        Ok(false) => std::process::exit(2),
        Err(e) => {
            tracing::error!("❌ {} (Category: {:?})", e, e.category());
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    }
}

/// Returns whether at least one file was saved.
fn run(config: &CliConfig) -> Result<bool> {
    let (data, settings) = match &config.input {
        Some(path) => {
            tracing::info!("📁 Loading student data from: {}", path.display());
            let file = StudentFile::from_file(path)?;
            file.validate()?;
            let data = file.to_student_data()?;
            display(config, &data)?;
            let settings = OutputSettings::from_section(file.output.as_ref()).apply_cli(config);
            (data, settings)
        }
        None => {
            let stdin = io::stdin();
            let mut prompter = Prompter::new(stdin.lock(), io::stdout());
            collect_interactively(config, &mut prompter)?
        }
    };

    settings.validate()?;
    tracing::debug!("Output settings: {:?}", settings);

    let stem = settings.filename_stem();
    let engine = ExportEngine::with_formats(&settings.formats, settings.csv_bom);
    let report = engine.run(&data, &stem.to_string_lossy())?;

    for (format, error) in report.failures() {
        eprintln!("❌ Failed to save {} output: {}", format, error);
    }

    let saved = report.saved_files();
    if saved.is_empty() {
        println!("\n❌ No file could be saved");
        return Ok(false);
    }

    println!("\n✅ Saved files:");
    for path in saved {
        println!("- {}", path.display());
    }
    Ok(true)
}

fn collect_interactively<R: BufRead, W: Write>(
    config: &CliConfig,
    prompter: &mut Prompter<R, W>,
) -> Result<(StudentData, OutputSettings)> {
    let rule = "=".repeat(50);
    println!("{}", rule);
    println!("{:^50}", "STUDENT PERFORMANCE RECORDS");
    println!("{}", rule);

    let data = prompter.collect_student_data()?;
    display(config, &data)?;

    let mut settings = OutputSettings::default().apply_cli(config);
    if config.prefix.is_none() {
        settings.prefix = prompter.read_prefix()?;
    }
    Ok((data, settings))
}

fn display(config: &CliConfig, data: &StudentData) -> Result<()> {
    if !config.no_display {
        print!("{}", render_summary(&data.export()?));
        io::stdout().flush()?;
    }
    Ok(())
}
