use clap::{Parser, Subcommand};
use ctxhmm::{cli, common::Snr, io};

#[derive(Parser, Debug)]
#[clap(author, about, version)]
struct Opts {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print per-base move probabilities of templates
    Populate {
        /// Parameter json of the chemistry
        #[clap(short = 'p', long)]
        params: std::path::PathBuf,
        /// Template sequence, or FASTA filename of templates
        #[clap(short = 't', long)]
        template: String,
        /// Signal-to-noise ratio of A,C,G,T channels
        #[clap(long, default_value = "10,10,10,10")]
        snr: Snr,
    },
    /// Print the counter-weight of the model
    CounterWeight {
        /// Parameter json of the chemistry
        #[clap(short = 'p', long)]
        params: std::path::PathBuf,
        /// Signal-to-noise ratio of A,C,G,T channels
        #[clap(long, default_value = "10,10,10,10")]
        snr: Snr,
    },
    /// Simulate reads from templates
    Simulate {
        /// Parameter json of the chemistry
        #[clap(short = 'p', long)]
        params: std::path::PathBuf,
        /// Template sequence, or FASTA filename of templates
        #[clap(short = 't', long)]
        template: String,
        /// Number of reads
        #[clap(short = 'n', default_value_t = 10)]
        n_reads: usize,
        /// Seed of the first read. Read i uses seed+i.
        #[clap(short = 's', default_value_t = 0)]
        seed: u64,
        /// Output json lines instead of FASTA
        #[clap(long)]
        json: bool,
    },
}

fn main() -> Result<(), io::IoError> {
    env_logger::init();
    let opts: Opts = Opts::parse();
    eprintln!("# started_at={}", chrono::Local::now());
    eprintln!("# n_threads={}", rayon::current_num_threads());
    eprintln!("# opts={:?}", opts);
    match &opts.command {
        Commands::Populate {
            params,
            template,
            snr,
        } => {
            let model = cli::load_model(params, *snr)?;
            let templates = io::read_templates(template)?;
            for (id, positions) in cli::populate(model.as_ref(), &templates)? {
                println!("{}", cli::format_positions(&id, &positions));
            }
        }
        Commands::CounterWeight { params, snr } => {
            let model = cli::load_model(params, *snr)?;
            let cw = cli::counter_weight(model.as_ref())?;
            println!("w\t{}", cw.weight());
            println!("-lnw\t{}", cw.neg_log_weight());
        }
        Commands::Simulate {
            params,
            template,
            n_reads,
            seed,
            json,
        } => {
            // snr of the instance is redrawn per read from the chemistry ranges
            let model = cli::load_model(params, Snr::uniform(0.0))?;
            let templates = io::read_templates(template)?;
            let reads = cli::simulate(model.as_ref(), &templates, *n_reads, *seed)?;
            let out = std::io::stdout();
            if *json {
                io::write_reads_json(out.lock(), &reads)?;
            } else {
                io::write_reads_fasta(out.lock(), &reads)?;
            }
        }
    }
    eprintln!("# finished_at={}", chrono::Local::now());
    Ok(())
}
