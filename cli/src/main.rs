use std::error::Error;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use arche_crossbar::{BatchPolicy, Generator, GeneratorOptions};
use arche_schedule::{MappingSolution, write_dot, write_trace};
use arche_verify::{AbcChecker, EquivalenceChecker, SimulationChecker};
use argparse::{ArgumentParser, List, Store, StoreOption, StoreTrue};
use tracing::{info, warn};

mod report;
mod session;

use report::{HEADER, Report};
use session::{Design, Session};

const DEFAULT_ROWS: usize = 16;
const DEFAULT_COLS: usize = 16;

#[derive(Debug)]
struct Options {
    inputs: Vec<String>,
    output: Option<String>,
    steps: Option<String>,
    graph: Option<String>,
    rows: Option<usize>,
    cols: Option<usize>,
    strict_batches: bool,
    stats: bool,
    stats_file: Option<String>,
    verify: Option<String>,
    simulate: bool,
    abc: String,
    workdir: Option<String>,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            inputs: Vec::new(),
            output: None,
            steps: None,
            graph: None,
            rows: None,
            cols: None,
            strict_batches: false,
            stats: false,
            stats_file: None,
            verify: None,
            simulate: false,
            abc: "abc".into(),
            workdir: None,
        }
    }
}

fn parse_options() -> Options {
    let mut options = Options::default();
    {
        let mut parser = ArgumentParser::new();
        parser.set_description(
            "Generate Verilog from a crossbar mapping solution. Every file is loaded in turn; the last one is mapped.",
        );
        parser.refer(&mut options.output).metavar("FILE").add_option(
            &["-o", "--output"],
            StoreOption,
            "Write Verilog to FILE instead of stdout",
        );
        parser.refer(&mut options.steps).metavar("FILE").add_option(
            &["-s", "--steps"],
            StoreOption,
            "Write the step trace to FILE",
        );
        parser.refer(&mut options.graph).metavar("FILE").add_option(
            &["-g", "--graph"],
            StoreOption,
            "Write the mapped netlist to FILE in graphviz format",
        );
        parser.refer(&mut options.rows).add_option(&["-r", "--rows"], StoreOption, "Number of crossbar rows");
        parser.refer(&mut options.cols).add_option(&["-c", "--cols"], StoreOption, "Number of crossbar columns");
        parser.refer(&mut options.strict_batches).add_option(
            &["--strict-batches"],
            StoreTrue,
            "Reject batches whose operations touch the same cell",
        );
        parser.refer(&mut options.stats).add_option(&["-p", "--stats"], StoreTrue, "Print mapping statistics");
        parser.refer(&mut options.stats_file).metavar("FILE").add_option(
            &["--stats-file"],
            StoreOption,
            "Append mapping statistics to FILE",
        );
        parser.refer(&mut options.verify).metavar("FILE").add_option(
            &["--verify"],
            StoreOption,
            "Check equivalence against the reference Verilog in FILE",
        );
        parser.refer(&mut options.simulate).add_option(
            &["--simulate"],
            StoreTrue,
            "Verify by exhaustive simulation instead of ABC",
        );
        parser.refer(&mut options.abc).metavar("PATH").add_option(&["--abc"], Store, "ABC executable");
        parser.refer(&mut options.workdir).metavar("DIR").add_option(
            &["--workdir"],
            StoreOption,
            "Directory for ABC scratch files",
        );
        parser.refer(&mut options.inputs).add_argument("input", List, "Mapping solution files").required();
        parser.parse_args_or_exit();
    }
    options
}

fn setup_tracing() {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{EnvFilter, Registry};

    let tree = tracing_tree::HierarchicalLayer::new(2).with_targets(true);
    Registry::default().with(EnvFilter::from_default_env()).with(tree).init();
}

fn verify(options: &Options, reference: &str, verilog: &str) -> Result<bool, Box<dyn Error>> {
    let golden = fs::read_to_string(reference)?;
    let checker: Box<dyn EquivalenceChecker> = if options.simulate {
        Box::new(SimulationChecker::new())
    } else {
        let workdir = options.workdir.as_ref().map(PathBuf::from).unwrap_or_else(std::env::temp_dir);
        Box::new(AbcChecker::new(workdir).with_program(&options.abc))
    };
    info!("verifying equivalence against {reference}");
    match checker.check(verilog, &golden) {
        Ok(result) => {
            eprint!("{}", result.raw_output);
            if result.equivalent {
                eprintln!("generated module is logically equivalent to {reference}");
            } else {
                eprintln!("generated module is not logically equivalent to {reference}");
            }
            Ok(result.equivalent)
        }
        Err(inconclusive) => {
            warn!("{inconclusive}");
            eprintln!("{inconclusive}");
            Ok(true)
        }
    }
}

fn run(options: &Options) -> Result<bool, Box<dyn Error>> {
    let mut session = Session::new();
    for file in &options.inputs {
        info!("reading {file}");
        let text = fs::read_to_string(file)?;
        let solution = MappingSolution::parse(&text).map_err(|error| format!("{file}: {error}"))?;
        session.load(Design { file: file.clone(), solution });
    }
    info!("{} designs loaded", session.len());
    let Some(design) = session.current() else {
        return Err("load a mapping solution before mapping".into());
    };
    let solution = &design.solution;

    let rows = options.rows.or(solution.rows).unwrap_or(DEFAULT_ROWS);
    let cols = options.cols.or(solution.cols).unwrap_or(DEFAULT_COLS);
    let batch_policy = if options.strict_batches { BatchPolicy::Disjoint } else { BatchPolicy::Sequential };
    let boundary = solution.netlist.boundary()?;

    let mut generator = Generator::new(rows, cols, GeneratorOptions { batch_policy });
    {
        let _span = tracing::debug_span!("generate", module = solution.name.as_str()).entered();
        generator.run(&solution.schedule)?;
    }
    let artifact = generator.finish(&solution.name, &boundary)?;
    info!("{} uses {} wires", solution.name, artifact.wire_count);

    match &options.output {
        Some(path) => fs::write(path, &artifact.verilog)?,
        None => io::stdout().write_all(artifact.verilog.as_bytes())?,
    }

    if let Some(path) = &options.steps {
        let mut file = File::create(path)?;
        write_trace(&mut file, &solution.schedule)?;
    }

    if let Some(path) = &options.graph {
        let mut file = File::create(path)?;
        write_dot(&mut file, &solution.netlist)?;
    }

    if options.stats || options.stats_file.is_some() {
        let report = Report::new(&design.file, solution, generator.state());
        if let Some(path) = &options.stats_file {
            let mut file = OpenOptions::new().create(true).append(true).open(path)?;
            writeln!(file, "{report}")?;
        }
        if options.stats {
            eprintln!("{HEADER}");
            eprintln!("{report}");
        }
    }

    match &options.verify {
        Some(reference) => verify(options, reference, &artifact.verilog),
        None => Ok(true),
    }
}

fn main() -> ExitCode {
    setup_tracing();
    let options = parse_options();
    match run(&options) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}
