// algotrace: step-recording algorithm drivers with a time-travel terminal player

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, Subcommand};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, Level};

use algotrace::drivers::avl::{self, TreeOp};
use algotrace::drivers::mst::MstAlgorithm;
use algotrace::drivers::searching::{self, SearchAlgorithm};
use algotrace::drivers::sorting::SortAlgorithm;
use algotrace::drivers::traversal::TraversalAlgorithm;
use algotrace::drivers::{parse_values, GenerateOptions, DEFAULT_MAX_STEPS};
use algotrace::model::{Graph, NodeId, TraversalOrder};
use algotrace::playback::Player;
use algotrace::scenario::Scenario;
use algotrace::ui::App;

/// Record an algorithm run and replay it step by step.
#[derive(Parser)]
#[command(name = "algotrace", version, about = "Step through classic algorithms")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Print the trace as JSON instead of opening the player.
    #[arg(long, global = true)]
    dump: bool,

    /// Abort generation after this many steps.
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_STEPS)]
    max_steps: usize,

    /// Log more to stderr (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Sort a list of integers.
    Sort {
        #[arg(short, long, value_enum, default_value = "bubble")]
        algorithm: SortAlgorithm,

        /// Comma- or space-separated integers, e.g. "5,3,4,1,2".
        #[arg(allow_hyphen_values = true)]
        values: String,
    },
    /// Search a list of integers for a target.
    Search {
        #[arg(short, long, value_enum, default_value = "linear")]
        algorithm: SearchAlgorithm,

        #[arg(allow_hyphen_values = true)]
        values: String,

        #[arg(short, long, allow_hyphen_values = true)]
        target: String,
    },
    /// Breadth- or depth-first traversal of a graph.
    Traverse {
        #[arg(short, long, value_enum, default_value = "bfs")]
        algorithm: TraversalAlgorithm,

        /// Graph JSON file (default: built-in sample graph).
        #[arg(short, long)]
        graph: Option<PathBuf>,

        #[arg(short, long)]
        start: Option<usize>,
    },
    /// Dijkstra's shortest paths from a source node.
    ShortestPath {
        #[arg(short, long)]
        graph: Option<PathBuf>,

        #[arg(short, long)]
        source: Option<usize>,

        #[arg(short, long)]
        target: Option<usize>,
    },
    /// Minimum spanning tree.
    Mst {
        #[arg(short, long, value_enum, default_value = "prim")]
        algorithm: MstAlgorithm,

        #[arg(short, long)]
        graph: Option<PathBuf>,
    },
    /// AVL insert/delete sequence, e.g. "+10,+20,+30,-10".
    Avl {
        #[arg(allow_hyphen_values = true)]
        ops: String,

        /// Trace a traversal of the resulting tree instead of the operations.
        #[arg(long, value_enum)]
        traverse: Option<TraversalOrder>,
    },
    /// Run a scenario JSON file.
    Scenario { path: PathBuf },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .init();
}

fn load_graph(path: Option<&Path>) -> Result<Option<Graph>, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(Some(serde_json::from_str(&fs::read_to_string(path)?)?)),
        None => Ok(None),
    }
}

fn scenario(command: Commands) -> Result<Scenario, Box<dyn std::error::Error>> {
    let scenario = match command {
        Commands::Sort { algorithm, values } => Scenario::Sort {
            algorithm,
            values: parse_values(&values)?,
        },
        Commands::Search {
            algorithm,
            values,
            target,
        } => Scenario::Search {
            algorithm,
            values: parse_values(&values)?,
            target: searching::parse_target(&target)?,
        },
        Commands::Traverse {
            algorithm,
            graph,
            start,
        } => Scenario::Traverse {
            algorithm,
            graph: load_graph(graph.as_deref())?,
            start: start.map(NodeId),
        },
        Commands::ShortestPath {
            graph,
            source,
            target,
        } => Scenario::ShortestPath {
            graph: load_graph(graph.as_deref())?,
            source: source.map(NodeId),
            target: target.map(NodeId),
        },
        Commands::Mst { algorithm, graph } => Scenario::Mst {
            algorithm,
            graph: load_graph(graph.as_deref())?,
        },
        Commands::Avl { ops, traverse } => {
            let ops: Vec<TreeOp> = avl::parse_ops(&ops)?;
            match traverse {
                Some(order) => Scenario::TreeTraversal { ops, order },
                None => Scenario::Avl { ops },
            }
        }
        Commands::Scenario { path } => Scenario::load(path)?,
    };
    Ok(scenario)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let options = GenerateOptions {
        max_steps: cli.max_steps,
    };

    let scenario = match scenario(cli.command) {
        Ok(scenario) => scenario,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let steps = match scenario.generate(&options) {
        Ok(steps) => steps,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    info!(steps = steps.len(), title = %scenario.title(), "generated trace");

    if cli.dump {
        println!("{}", steps.to_json()?);
        return Ok(());
    }

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(Player::new(steps), scenario.title());
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
