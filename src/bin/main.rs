//! The `routingcubes` CLI: wires a network file and a recipe file to a
//! `Presenter` and drives it to completion (or for a fixed number of
//! cycles), logging progress as it goes.

use std::process::ExitCode;

use getopts::Options;
use log::{info, trace};

use routingcubes_lib::error::Error;
use routingcubes_lib::presenter::Presenter;
use routingcubes_lib::{algorithms, loader};

struct CliOptions {
	algorithm: String,
	network: Option<String>,
	recipe: Option<String>,
	size: u32,
	cycles: i64,
	verbose: bool,
}

fn usage(program: &str, opts: &Options) -> String {
	let brief = format!("Usage: {} ALGORITHM [options]", program);
	opts.usage(&brief)
}

fn parse_args(args: &[String]) -> Result<CliOptions, Error> {
	let mut opts = Options::new();
	opts.optopt("n", "network", "network topology file", "PATH");
	opts.optopt("r", "recipe", "recipe script file", "PATH");
	opts.optopt("s", "size", "minimum universe cube side", "N");
	opts.optopt("c", "colormode", "viewer color mode (ignored by the core)", "NAME");
	opts.optopt("", "cycles", "number of cycles to run (default: unbounded)", "N");
	opts.optflag("v", "verbose", "raise log verbosity");
	opts.optflag("h", "help", "print this help and exit");

	let program = args.first().cloned().unwrap_or_else(|| "routingcubes".to_string());
	let matches = opts
		.parse(&args[1..])
		.map_err(|e| Error::Cli(e.to_string()))?;

	if matches.opt_present("h") {
		println!("{}", usage(&program, &opts));
		std::process::exit(0);
	}

	let algorithm = matches
		.free
		.first()
		.cloned()
		.ok_or_else(|| Error::Cli(format!("missing ALGORITHM argument\n\n{}", usage(&program, &opts))))?;

	let size = match matches.opt_str("s") {
		Some(s) => s.parse::<u32>().map_err(|_| Error::Cli(format!("`{}` is not a valid size", s)))?,
		None => 0,
	};
	let cycles = match matches.opt_str("cycles") {
		Some(s) => s.parse::<i64>().map_err(|_| Error::Cli(format!("`{}` is not a valid cycle count", s)))?,
		None => -1,
	};

	Ok(CliOptions {
		algorithm,
		network: matches.opt_str("n"),
		recipe: matches.opt_str("r"),
		size,
		cycles,
		verbose: matches.opt_present("v"),
	})
}

fn run(opts: CliOptions) -> Result<(), Error> {
	let (routing_algorithm, robot_algorithm) = algorithms::by_name(&opts.algorithm)?;
	let mut presenter = Presenter::new(routing_algorithm, robot_algorithm);
	presenter.set_min_side(opts.size);

	if let Some(path) = &opts.network {
		presenter.populate_network(path)?;
		info!("loaded network from {}", path);
	}
	if let Some(path) = &opts.recipe {
		presenter.set_recipe(loader::load_recipe_file(path)?);
		info!("loaded recipe from {}", path);
	}

	trace!("running for {} cycle(s)", opts.cycles);
	presenter.run(opts.cycles, false)?;
	info!("run finished, {} node(s) in the grid", presenter.grid().num_nodes());
	Ok(())
}

fn main() -> ExitCode {
	let args: Vec<String> = std::env::args().collect();

	let opts = match parse_args(&args) {
		Ok(opts) => opts,
		Err(e) => {
			eprintln!("{}", e);
			return ExitCode::FAILURE;
		}
	};

	let default_level = if opts.verbose { "debug" } else { "warn" };
	if std::env::var("RUST_LOG").is_err() {
		std::env::set_var("RUST_LOG", default_level);
	}
	pretty_env_logger::init();

	match run(opts) {
		Ok(()) => ExitCode::SUCCESS,
		Err(e) => {
			eprintln!("error: {}", e);
			ExitCode::FAILURE
		}
	}
}
