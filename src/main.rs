use std::{
    io::{stdout, Stdout},
    path::PathBuf,
    process::ExitCode,
};

use clap::{Parser, Subcommand};
use inquire::{InquireError, Select};
use tracing::info;
use tracing_subscriber::EnvFilter;

use spendbook::{
    app::{AddOutcome, Confirmation, DeleteOutcome, ExpenseTracker, TrackerSettings},
    config::{parse_config, SpendbookConfig},
    console::{
        chart::ConsoleChart,
        form::{InquireForm, PresetForm},
        table::ConsoleTable,
        ConsoleAlert, InquireConfirm,
    },
    errors::SpendbookError,
    expenses::{ExpenseId, RawExpenseInput},
    render::table::table_rows,
    storage::FileStore,
};

#[derive(Parser, Debug)]
#[command(version, about = "Record expenses and see where the money goes", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
    /// Config file to use instead of the default lookup
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the expense table and the category chart
    List,
    /// Add an expense, prompting for anything not given
    Add {
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long, allow_hyphen_values = true)]
        amount: Option<String>,
        #[arg(short = 'c', long)]
        category: Option<String>,
    },
    /// Delete the expense with the given id
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Keep adding and deleting expenses until you quit
    Interactive,
}

type ConsoleTracker = ExpenseTracker<FileStore, ConsoleTable<Stdout>, ConsoleChart<Stdout>>;

fn init_tracing(config: &SpendbookConfig, debug: bool) {
    let filter = if debug {
        EnvFilter::new("spendbook=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("spendbook={}", config.log_level)))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_tracker(config: &SpendbookConfig) -> Result<ConsoleTracker, SpendbookError> {
    let data_dir = config.data_dir()?;
    info!("using data directory {}", data_dir.display());
    let settings = TrackerSettings {
        date_format: config.date_format.clone(),
        decimal_sep: config.decimal_sep,
    };
    Ok(ExpenseTracker::new(
        FileStore::new(data_dir),
        ConsoleTable::new(stdout(), config.currency),
        ConsoleChart::new(stdout()),
        settings,
    ))
}

fn inquire_form(config: &SpendbookConfig) -> InquireForm {
    InquireForm::new(
        config.categories.clone(),
        config.currency,
        config.decimal_sep,
    )
}

fn is_cancel(err: &SpendbookError) -> bool {
    matches!(
        err,
        SpendbookError::Prompt(InquireError::OperationCanceled | InquireError::OperationInterrupted)
    )
}

fn add(
    tracker: &mut ConsoleTracker,
    config: &SpendbookConfig,
    input: RawExpenseInput,
    complete: bool,
) -> Result<ExitCode, SpendbookError> {
    let outcome = if complete {
        tracker.add_expense(&mut PresetForm::new(input), &mut ConsoleAlert)?
    } else {
        tracker.add_expense(&mut inquire_form(config).with_input(input), &mut ConsoleAlert)?
    };
    Ok(match outcome {
        AddOutcome::Added(id) => {
            println!("Added expense {id}");
            ExitCode::SUCCESS
        }
        AddOutcome::Rejected(_) => ExitCode::FAILURE,
    })
}

fn delete(
    tracker: &mut ConsoleTracker,
    id: &ExpenseId,
    confirmation: &mut impl Confirmation,
) -> Result<(), SpendbookError> {
    if !tracker.store().contains(id) {
        println!("No expense with id {id}");
        return Ok(());
    }
    match tracker.delete_expense(id, confirmation)? {
        DeleteOutcome::Deleted => println!("Deleted expense {id}"),
        DeleteOutcome::Declined => println!("Kept expense {id}"),
    }
    Ok(())
}

fn interactive(
    tracker: &mut ConsoleTracker,
    config: &SpendbookConfig,
) -> Result<(), SpendbookError> {
    const ADD: &str = "Add expense";
    const DELETE: &str = "Delete expense";
    const QUIT: &str = "Quit";

    tracker.start()?;
    // kept across iterations so a rejected entry can be corrected
    let mut form = inquire_form(config);
    loop {
        let choice = match Select::new("What next?", vec![ADD, DELETE, QUIT]).prompt() {
            Ok(choice) => choice,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err.into()),
        };
        let result = match choice {
            ADD => tracker.add_expense(&mut form, &mut ConsoleAlert).map(|_| ()),
            DELETE => {
                let rows = table_rows(tracker.expenses());
                if rows.is_empty() {
                    println!("Nothing to delete");
                    continue;
                }
                let options: Vec<String> = rows
                    .iter()
                    .map(|row| {
                        format!(
                            "{} {} {} {} [{}]",
                            row.date, row.description, row.category, row.amount, row.id
                        )
                    })
                    .collect();
                match Select::new("Delete which expense?", options).raw_prompt() {
                    Ok(selected) => {
                        let id = rows[selected.index].id.clone();
                        delete(tracker, &id, &mut InquireConfirm)
                    }
                    Err(err) => Err(err.into()),
                }
            }
            _ => break,
        };
        match result {
            Err(err) if is_cancel(&err) => continue,
            other => other?,
        }
    }
    Ok(())
}

fn main() -> Result<ExitCode, SpendbookError> {
    let args = Args::parse();
    let (config, source) = parse_config(args.config.as_deref())?;
    init_tracing(&config, args.debug);
    match source {
        Some(path) => info!("config file found at {}", path.display()),
        None => info!("no config file found, using defaults"),
    }

    let mut tracker = build_tracker(&config)?;

    match args.command {
        Command::List => tracker.start()?,
        Command::Add {
            description,
            amount,
            category,
        } => {
            let complete = description.is_some() && amount.is_some() && category.is_some();
            let input = RawExpenseInput::new(
                description.unwrap_or_default(),
                amount.unwrap_or_default(),
                category.unwrap_or_default(),
            );
            return match add(&mut tracker, &config, input, complete) {
                Err(err) if is_cancel(&err) => Ok(ExitCode::FAILURE),
                other => other,
            };
        }
        Command::Delete { id, yes } => {
            let id = ExpenseId::from(id);
            if yes {
                delete(&mut tracker, &id, &mut |_: &str| true)?;
            } else {
                delete(&mut tracker, &id, &mut InquireConfirm)?;
            }
        }
        Command::Interactive => interactive(&mut tracker, &config)?,
    }

    Ok(ExitCode::SUCCESS)
}
