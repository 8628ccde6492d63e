use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use falcon_core::{
    benchmark::{BenchmarkDefinition, BenchmarkStore},
    config::{data_dir_from_values, store_namespace_from_env_value, CoreConfig},
    constants::DEFAULT_BENCHMARK_SOURCE,
    dialysis::{AccessUpdate, BenchmarkUpdate, DialysisReportSession, EventUpdate, ReportPeriod},
    gate::verify_passcode,
    kv::FileStore,
    records::{NewEntry, RecordStore},
    report::{current_year_month, dashboard, ModuleReport, ReportFilter},
    EntryId, Month, NonEmptyText, Population, SurveillanceModule, Year,
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod render;

#[derive(Parser)]
#[command(name = "falcon")]
#[command(about = "Falcon infection surveillance data entry and reporting")]
struct Cli {
    /// Data directory (overrides FALCON_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add, list or delete surveillance entries
    #[command(subcommand)]
    Entry(EntryCommand),
    /// Add, list or delete benchmark rates
    #[command(subcommand)]
    Benchmark(BenchmarkCommand),
    /// Average rate per module for one month
    Dashboard {
        /// Year (defaults to the current year)
        #[arg(long)]
        year: Option<Year>,
        /// Month name or number (defaults to the current month)
        #[arg(long)]
        month: Option<Month>,
    },
    /// Monthly rates for one module over a year
    Report {
        /// Surveillance module (VAE, CLABSI, CAUTI, SSI, DE)
        #[arg(long)]
        module: SurveillanceModule,
        /// Population, used for VAE, CLABSI and CAUTI
        #[arg(long, default_value = "Adults")]
        population: Population,
        /// Year (defaults to the current year)
        #[arg(long)]
        year: Option<Year>,
    },
    /// Generate the monthly dialysis event report
    Dialysis(DialysisArgs),
    /// Show the period of the last dialysis report
    Period,
}

#[derive(Subcommand)]
enum EntryCommand {
    /// Record one month of counts
    Add {
        /// Surveillance module (VAE, CLABSI, CAUTI, SSI, DE)
        #[arg(long)]
        module: SurveillanceModule,
        /// Population, used for VAE, CLABSI and CAUTI
        #[arg(long, default_value = "Adults")]
        population: Population,
        /// Month name or number (defaults to the current month)
        #[arg(long)]
        month: Option<Month>,
        /// Year (defaults to the current year)
        #[arg(long)]
        year: Option<Year>,
        /// Number of events
        #[arg(long, default_value_t = 0)]
        numerator: u32,
        /// Device-days, procedures or patients
        #[arg(long, default_value_t = 0)]
        denominator: u32,
        /// Reference rate to keep with the entry
        #[arg(long)]
        benchmark: Option<f64>,
    },
    /// List all entries
    List,
    /// Delete an entry by id
    Delete {
        /// Entry id (32 lowercase hex characters)
        id: EntryId,
    },
}

#[derive(Subcommand)]
enum BenchmarkCommand {
    /// Add a benchmark rate
    Add {
        /// Surveillance module (VAE, CLABSI, CAUTI, SSI, DE)
        #[arg(long)]
        module: SurveillanceModule,
        /// Population, used for VAE, CLABSI and CAUTI
        #[arg(long, default_value = "Adults")]
        population: Population,
        /// Benchmark rate (non-zero)
        #[arg(long)]
        rate: f64,
        /// Where the benchmark comes from
        #[arg(long, default_value = DEFAULT_BENCHMARK_SOURCE)]
        source: NonEmptyText,
        /// Year (defaults to the current year)
        #[arg(long)]
        year: Option<Year>,
    },
    /// List benchmarks with their positions
    List,
    /// Delete the benchmark at a list position
    Delete {
        /// Position as shown by `benchmark list`
        index: usize,
    },
}

#[derive(Args)]
struct DialysisArgs {
    /// Shared report passcode
    #[arg(long)]
    passcode: String,
    /// Report month name or number (defaults to the current month)
    #[arg(long)]
    month: Option<Month>,
    /// Report year (defaults to the current year)
    #[arg(long)]
    year: Option<Year>,
    /// Patients with a central venous catheter
    #[arg(long, default_value_t = 0)]
    cvc: u32,
    /// Patients with an arteriovenous fistula
    #[arg(long, default_value_t = 0)]
    avf: u32,
    /// Patients with an arteriovenous graft
    #[arg(long, default_value_t = 0)]
    avg: u32,
    /// Pus at access site
    #[arg(long, default_value_t = 0)]
    puss: u32,
    /// Redness at access site
    #[arg(long, default_value_t = 0)]
    redness: u32,
    /// Access infections
    #[arg(long, default_value_t = 0)]
    infection: u32,
    /// Intravenous antimicrobial starts
    #[arg(long, default_value_t = 0)]
    antimicrobial_start: u32,
    /// Positive blood cultures
    #[arg(long, default_value_t = 0)]
    positive_blood_culture: u32,
    /// Report the month as event-free regardless of the counts
    #[arg(long)]
    no_events: bool,
    /// Internal benchmark rate (%)
    #[arg(long)]
    internal_benchmark: f64,
    /// External benchmark rate (%), 0 for none
    #[arg(long, default_value_t = 0.0)]
    external_benchmark: f64,
    /// Also write the report to this file
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("falcon=info".parse()?))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let data_dir = data_dir_from_values(cli.data_dir, std::env::var("FALCON_DATA_DIR").ok());
    let store_namespace =
        store_namespace_from_env_value(std::env::var("FALCON_STORE_NAMESPACE").ok())?;
    let cfg = CoreConfig::new(data_dir, store_namespace)?;
    tracing::debug!("using store at {}", cfg.store_dir().display());

    let (current_year, current_month) = current_year_month();

    match cli.command {
        Some(Commands::Entry(command)) => run_entry(&cfg, command, current_year, current_month),
        Some(Commands::Benchmark(command)) => run_benchmark(&cfg, command, current_year),
        Some(Commands::Dashboard { year, month }) => {
            let records = RecordStore::load(FileStore::new(&cfg));
            let year = year.unwrap_or(current_year);
            let month = month.unwrap_or(current_month);
            let tiles = dashboard(records.entries(), year, month);
            print!("{}", render::dashboard(&tiles, year, month));
            Ok(())
        }
        Some(Commands::Report {
            module,
            population,
            year,
        }) => {
            let records = RecordStore::load(FileStore::new(&cfg));
            let benchmarks = BenchmarkStore::load(FileStore::new(&cfg));
            let filter = ReportFilter {
                module,
                population: module.applicable_population(Some(population)),
                year: year.unwrap_or(current_year),
            };
            let benchmark = benchmarks.find(filter.module, filter.population, filter.year);
            let report = ModuleReport::build(records.entries(), filter, benchmark);
            print!("{}", render::module_report(&report));
            Ok(())
        }
        Some(Commands::Dialysis(args)) => run_dialysis(&cfg, args, current_year, current_month),
        Some(Commands::Period) => {
            match ReportPeriod::load(&FileStore::new(&cfg)) {
                Some(period) => println!("{} {}", period.month, period.year),
                None => println!("No report period saved."),
            }
            Ok(())
        }
        None => {
            println!("Use 'falcon --help' for commands");
            Ok(())
        }
    }
}

fn run_entry(
    cfg: &CoreConfig,
    command: EntryCommand,
    current_year: Year,
    current_month: Month,
) -> anyhow::Result<()> {
    let mut records = RecordStore::load(FileStore::new(cfg));

    match command {
        EntryCommand::Add {
            module,
            population,
            month,
            year,
            numerator,
            denominator,
            benchmark,
        } => {
            let entry = records.add(NewEntry {
                module,
                population: Some(population),
                month: month.unwrap_or(current_month),
                year: year.unwrap_or(current_year),
                numerator,
                denominator,
                benchmark,
            })?;
            println!("Saved {} entry with ID: {}", entry.module(), entry.id());
            println!("Rate: {}", falcon_core::rate::format_rate(entry.rate()));
        }
        EntryCommand::List => {
            if records.entries().is_empty() {
                println!("No entries found.");
            } else {
                print!("{}", render::entries(records.entries()));
            }
        }
        EntryCommand::Delete { id } => match records.delete(id) {
            Some(entry) => println!("Deleted {} entry {}", entry.module(), id),
            None => println!("No entry with ID: {}", id),
        },
    }

    Ok(())
}

fn run_benchmark(
    cfg: &CoreConfig,
    command: BenchmarkCommand,
    current_year: Year,
) -> anyhow::Result<()> {
    let mut benchmarks = BenchmarkStore::load(FileStore::new(cfg));

    match command {
        BenchmarkCommand::Add {
            module,
            population,
            rate,
            source,
            year,
        } => {
            let benchmark = BenchmarkDefinition::new(
                module,
                Some(population),
                rate,
                source,
                year.unwrap_or(current_year),
            )?;
            benchmarks.add(benchmark);
            println!(
                "Saved benchmark at position {}",
                benchmarks.benchmarks().len() - 1
            );
        }
        BenchmarkCommand::List => {
            if benchmarks.benchmarks().is_empty() {
                println!("No benchmarks configured.");
            } else {
                print!("{}", render::benchmarks(benchmarks.benchmarks()));
            }
        }
        BenchmarkCommand::Delete { index } => match benchmarks.delete(index) {
            Some(removed) => println!(
                "Deleted {} benchmark {} ({})",
                removed.module, removed.rate, removed.source
            ),
            None => println!("No benchmark at position {}", index),
        },
    }

    Ok(())
}

fn run_dialysis(
    cfg: &CoreConfig,
    args: DialysisArgs,
    current_year: Year,
    current_month: Month,
) -> anyhow::Result<()> {
    verify_passcode(&args.passcode)?;

    let session = DialysisReportSession::new()
        .with_access(AccessUpdate {
            cvc: Some(args.cvc),
            avf: Some(args.avf),
            avg: Some(args.avg),
        })
        .with_events(EventUpdate {
            puss: Some(args.puss),
            redness: Some(args.redness),
            infection: Some(args.infection),
            antimicrobial_start: Some(args.antimicrobial_start),
            positive_blood_culture: Some(args.positive_blood_culture),
            no_events: Some(args.no_events),
        })
        .with_benchmarks(BenchmarkUpdate {
            internal: Some(args.internal_benchmark),
            external: Some(args.external_benchmark),
        });

    let entered = ReportPeriod {
        month: args.month.unwrap_or(current_month),
        year: args.year.unwrap_or(current_year),
    };
    let mut store = FileStore::new(cfg);
    entered.save(&mut store);
    let period = ReportPeriod::load(&store).unwrap_or(entered);

    let generated_on = chrono::Local::now().date_naive();
    let report = render::dialysis_report(&session, &period, generated_on);
    print!("{}", report);

    if let Some(path) = args.output {
        std::fs::write(&path, &report)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        tracing::info!("wrote dialysis report to {}", path.display());
    }

    Ok(())
}
