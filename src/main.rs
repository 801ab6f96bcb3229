use anyhow::{bail, ensure, Context, Result};
use indicatif::{ProgressBar, ProgressIterator, ProgressStyle};
use log::info;
use std::{
    env,
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use aozora_tree::{
    jis_x_0213::JisX0213Table,
    ruby_txt::{
        self,
        parser::ParserOption,
        tree::Node,
        walker::{TreeDumper, TreeWalker},
    },
    utility::source::{read_source, SourceEncoding},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Json,
    Tree,
}

impl OutputFormat {
    fn of(name: &str) -> Result<Self> {
        match name {
            "json" => Ok(Self::Json),
            "tree" => Ok(Self::Tree),
            name => bail!("Unknown format: {}", name),
        }
    }

    fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Tree => "txt",
        }
    }
}

struct Args {
    input_paths: Vec<PathBuf>,
    output_path: Option<PathBuf>,
    jis_table_path: Option<PathBuf>,
    format: OutputFormat,
    encoding: SourceEncoding,
    strict: bool,
}

fn get_args() -> Result<Option<Args>> {
    let args: Vec<String> = env::args().skip(1).collect();

    let mut opts = getopts::Options::new();
    opts.optflag("s", "strict", "fail if a block is left open at the end");
    opts.optopt("f", "format", "output format (default: tree)", "json|tree");
    opts.optopt(
        "e",
        "encoding",
        "encoding of input files (default: shift_jis)",
        "shift_jis|utf-8",
    );
    opts.optopt("j", "jis-table", "JIS X 0213 table to resolve external characters", "PATH");
    opts.optopt("o", "output", "directory to write results into", "DIR");
    opts.optflag("h", "help", "print this help");

    let matches = match opts.parse(&args) {
        Ok(m) => m,
        Err(f) => bail!(f),
    };

    if matches.opt_present("h") {
        print!("{}", opts.usage("Usage: aozora-tree [options] FILE..."));
        return Ok(None);
    }

    let input_paths: Vec<PathBuf> = matches.free.iter().map(PathBuf::from).collect();
    ensure!(!input_paths.is_empty(), "input file is required");

    let format = match matches.opt_str("f") {
        Some(format) => OutputFormat::of(&format)?,
        None => OutputFormat::Tree,
    };

    let encoding = match matches.opt_str("e") {
        Some(encoding) => SourceEncoding::of(&encoding)?,
        None => SourceEncoding::ShiftJis,
    };

    Ok(Some(Args {
        input_paths,
        output_path: matches.opt_str("o").map(PathBuf::from),
        jis_table_path: matches.opt_str("j").map(PathBuf::from),
        format,
        encoding,
        strict: matches.opt_present("s"),
    }))
}

fn main() -> Result<()> {
    // RUST_LOG で上書きできる
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = match get_args()? {
        Some(args) => args,
        None => return Ok(()),
    };

    for path in &args.input_paths {
        ensure!(path.exists(), "File not found: {}", path.display());
    }

    let jis_table = match &args.jis_table_path {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let table = JisX0213Table::from_json(&json)?;
            info!("Loaded {} JIS X 0213 characters", table.len());
            Some(table)
        }
        None => None,
    };

    if let Some(output_path) = &args.output_path {
        fs::create_dir_all(output_path).with_context(|| {
            format!("Failed to create output directory: {}", output_path.display())
        })?;
    }

    let option = if args.strict {
        ParserOption::strict()
    } else {
        ParserOption::default()
    };

    let pb = if 1 < args.input_paths.len() {
        create_progress_bar(args.input_paths.len() as u64)
    } else {
        ProgressBar::hidden()
    };

    for path in args.input_paths.iter().progress_with(pb) {
        info!("Processing {}", path.display());

        (|| {
            let text = read_source(path, args.encoding)?;
            let tree = ruby_txt::parse(&text, option.clone())?;

            match &args.output_path {
                Some(output_path) => {
                    let file_path = output_file_path(output_path, path, args.format)?;
                    let file = File::create(&file_path)
                        .with_context(|| format!("Failed to create {}", file_path.display()))?;
                    write_tree(BufWriter::new(file), &tree, args.format, jis_table.as_ref())
                }
                None => write_tree(io::stdout().lock(), &tree, args.format, jis_table.as_ref()),
            }
        })()
        .with_context(|| format!("Failed to process {}", path.display()))?;
    }

    info!("Finished.");

    Ok(())
}

fn write_tree<W: Write>(
    mut out: W,
    tree: &Node,
    format: OutputFormat,
    jis_table: Option<&JisX0213Table>,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer(&mut out, tree)?;
            writeln!(out)?;
            out.flush()?;
        }

        OutputFormat::Tree => {
            let mut dumper = TreeDumper::new(out);
            if let Some(jis_table) = jis_table {
                dumper = dumper.with_jis_table(jis_table);
            }
            dumper.start(tree)?;
        }
    }

    Ok(())
}

fn output_file_path(output_path: &Path, input_path: &Path, format: OutputFormat) -> Result<PathBuf> {
    let stem = input_path
        .file_stem()
        .with_context(|| format!("Invalid file name: {}", input_path.display()))?;
    Ok(output_path.join(format!(
        "{}.{}",
        stem.to_string_lossy(),
        format.extension()
    )))
}

fn create_progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::with_template(
            "{percent:>3}% [{wide_bar:.cyan/blue}] {pos}/{len} [{elapsed_precise} < {eta_precise}]",
        )
        .unwrap()
        .progress_chars("#-"),
    );
    pb
}
