use crate::config::load_config;
use crate::instance::Instance;
use crate::layout::compute_tree_layout;
use crate::layout_dump::{write_layout_dump, LayoutDump};
use crate::path::{trace_instance_path, TracedPath};
use crate::tree::{DecisionTree, NodeRecord};
use anyhow::Result;
use clap::Parser;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "dpl", version, about = "Decision tree layout engine with instance-path highlighting")]
pub struct Args {
    /// Tree node records JSON (array) or '-' for stdin
    #[arg(short = 't', long = "tree")]
    pub tree: PathBuf,

    /// Instance JSON (feature -> value map). Omitted: balanced layout, no
    /// highlighted path.
    #[arg(short = 'i', long = "instance")]
    pub instance: Option<PathBuf>,

    /// Config JSON file (camelCase layout constants)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Output file for the layout dump. Defaults to stdout.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

pub fn run() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    let records: Vec<NodeRecord> = serde_json::from_str(&read_input(&args.tree)?)?;
    let tree = DecisionTree::from_records(records)?;

    let path = match args.instance.as_deref() {
        Some(instance_path) => {
            let instance: Instance = serde_json::from_str(&read_input(instance_path)?)?;
            trace_instance_path(&tree, &instance)
        }
        None => TracedPath::empty(),
    };

    let layout = compute_tree_layout(&tree, &path, &config);
    match args.output.as_deref() {
        Some(output) => write_layout_dump(output, &layout, &tree)?,
        None => {
            let dump = LayoutDump::from_layout(&layout, &tree);
            println!("{}", serde_json::to_string_pretty(&dump)?);
        }
    }
    Ok(())
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    Ok(std::fs::read_to_string(path)?)
}
