use clap::Parser;
use include_ext::application::{DocumentExpander, SelectLinesService};
use include_ext::cli::{Cli, Commands};
use include_ext::domain::CollectedDiagnostics;
use include_ext::error::IncludeError;
use include_ext::infrastructure::{logging, DefaultLoader, TracingDiagnostics};
use std::fs;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = run(cli);

    match result {
        Ok(_) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {}", e.display_with_suggestions());
            std::process::exit(e.exit_code());
        }
    }
}

fn run(cli: Cli) -> Result<(), IncludeError> {
    let loader = DefaultLoader::new();

    match cli.command {
        Commands::Expand {
            file,
            output,
            strict,
            policy,
        } => {
            let config = policy.to_config()?;
            let collected = CollectedDiagnostics::new();
            let expander = DocumentExpander::new(config, &loader, &collected);
            let expanded = expander.expand_file(&file)?;
            collected.replay(&TracingDiagnostics);

            match output {
                Some(path) => fs::write(&path, format!("{}\n", expanded))?,
                None => println!("{}", expanded),
            }

            match collected.first_error() {
                Some(diagnostic) if strict => Err(IncludeError::Unresolved(diagnostic)),
                _ => Ok(()),
            }
        }
        Commands::Select { file, selection } => {
            let service = SelectLinesService::new(&loader, &TracingDiagnostics);
            let selected = service.execute(&file, &selection.selection())?;

            for line in selected.lines {
                println!("{}", line);
            }
            Ok(())
        }
        Commands::Config { path, policy } => {
            let config = policy.to_config()?;
            config.save_to_file(&path)?;
            println!("Wrote config to: {}", path.display());
            Ok(())
        }
    }
}
