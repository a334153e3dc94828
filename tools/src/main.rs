use anyhow::{Context as _, Result};
use clap::{Args, Parser, Subcommand};
use polaca::{Function, ImplicitCurve, RootFinder};

#[derive(Parser, Debug)]
#[command(
    name = "polaca",
    version,
    about = "Evaluate, integrate and intersect math expressions in x"
)]
struct Cli {
    /// Without a command an interactive prompt is started.
    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate an expression.
    Eval {
        #[arg(allow_hyphen_values = true)]
        expr: String,
        /// Value bound to x.
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        at: f64,
    },
    /// Find the points where two expressions meet.
    Roots {
        #[arg(allow_hyphen_values = true)]
        f: String,
        #[arg(allow_hyphen_values = true)]
        g: String,
        #[command(flatten)]
        range: Range,
        #[command(flatten)]
        finder: FinderArgs,
    },
    /// Approximate the definite integral of an expression.
    Area {
        #[arg(allow_hyphen_values = true)]
        expr: String,
        #[command(flatten)]
        range: Range,
        /// Number of trapezoids.
        #[arg(long, default_value_t = 1000)]
        steps: usize,
    },
    /// Solve `lhs = rhs` for y at a fixed x.
    Implicit {
        #[arg(allow_hyphen_values = true)]
        lhs: String,
        #[arg(allow_hyphen_values = true)]
        rhs: String,
        #[arg(long, allow_hyphen_values = true)]
        at: f64,
        #[command(flatten)]
        range: Range,
    },
}

#[derive(Args, Debug)]
struct Range {
    /// Lower bound.
    #[arg(long, default_value_t = -10.0, allow_hyphen_values = true)]
    from: f64,
    /// Upper bound.
    #[arg(long, default_value_t = 10.0, allow_hyphen_values = true)]
    to: f64,
}

#[derive(Args, Debug)]
struct FinderArgs {
    /// Sub-intervals scanned for sign changes.
    #[arg(long, default_value_t = 1000)]
    intervals: usize,
    /// Newton's stopping distance.
    #[arg(long, default_value_t = 1.0e-5)]
    accuracy: f64,
    #[arg(long, default_value_t = 1000)]
    max_iterations: usize,
}

impl From<&FinderArgs> for RootFinder {
    fn from(args: &FinderArgs) -> Self {
        RootFinder {
            intervals: args.intervals,
            accuracy: args.accuracy,
            max_iterations: args.max_iterations,
        }
    }
}

fn parse(expr: &str) -> Result<Function> {
    Function::parse(expr).with_context(|| format!("can't parse '{}'", expr))
}

fn run(cmd: Command) -> Result<()> {
    match cmd {
        Command::Eval { expr, at } => {
            let f = parse(&expr)?;
            println!("{} = {}", f.infix(), f.eval(at));
        }
        Command::Roots { f, g, range, finder } => {
            let (f, g) = (parse(&f)?, parse(&g)?);
            let points = f.intersections(&g, &RootFinder::from(&finder), range.from, range.to);
            if points.is_empty() {
                println!("no intersections in [{}, {}]", range.from, range.to);
            }
            for p in points {
                println!("x: {:.5}, y: {:.5}", p.x, p.y);
            }
        }
        Command::Area { expr, range, steps } => {
            let f = parse(&expr)?;
            let area = f.area(range.from, range.to, steps);
            if area.is_nan() {
                anyhow::bail!("{} is undefined somewhere in [{}, {}]", f, range.from, range.to);
            }
            println!("{:.5}", area);
        }
        Command::Implicit { lhs, rhs, at, range } => {
            let curve = ImplicitCurve::parse(&lhs, &rhs)
                .with_context(|| format!("can't parse '{} = {}'", lhs, rhs))?;
            let ys = curve.values_at(at, range.from, range.to);
            for y in ys {
                println!("x: {:.5}, y: {:.5}", at, y);
            }
        }
    }
    Ok(())
}

mod repl {
    use polaca::ShuntingParser;

    /// `x = <expr>` rebinds x, anything else is evaluated at the current x.
    pub fn parse_statement(x: &mut f64, input: &str) {
        let input = input.trim();
        let assignment = input
            .strip_prefix('x')
            .and_then(|rest| rest.trim_start().strip_prefix('='));
        if let Some(rhs) = assignment {
            match ShuntingParser::parse_str(rhs) {
                Err(e) => println!("Parse error: {}", e),
                Ok(rpn) => {
                    let value = rpn.eval(*x);
                    if value.is_nan() {
                        println!("Undefined at x = {}", x);
                    } else {
                        *x = value;
                        println!("x = {}", x);
                    }
                }
            }
            return;
        }
        match ShuntingParser::parse_str(input) {
            Err(e) => println!("Parse error: {}", e),
            Ok(rpn) => println!("{} = {}", rpn, rpn.eval(*x)),
        }
    }
}

fn interactive() -> Result<()> {
    use rustyline::error::ReadlineError;
    let mut rl = rustyline::DefaultEditor::new()?;
    let mut x = 0.0;
    loop {
        match rl.readline(">> ") {
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return Ok(()),
            Err(e) => return Err(e.into()),
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line.as_str());
                repl::parse_statement(&mut x, &line);
            }
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("{:?}", cli);
    match cli.cmd {
        None => interactive(),
        Some(cmd) => run(cmd),
    }
}
