use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use scicalc::{AngleMode, Config, Plot, Session};

#[derive(Parser)]
#[command(name = "scicalc")]
#[command(about = "A scientific calculator with a function plotter")]
#[command(version)]
struct Cli {
    /// Start in radians instead of degrees
    #[arg(long)]
    radians: bool,
    /// Number of samples of a plot
    #[arg(long, default_value_t = 41)]
    samples: usize,
    /// Default left bound of plots
    #[arg(long, default_value_t = -10.0, allow_negative_numbers = true)]
    xmin: f64,
    /// Default right bound of plots
    #[arg(long, default_value_t = 10.0, allow_negative_numbers = true)]
    xmax: f64,
}

impl Cli {
    fn config(&self) -> Config {
        let angle_mode = if self.radians {
            AngleMode::Radians
        } else {
            AngleMode::Degrees
        };
        Config::default()
            .with_angle_mode(angle_mode)
            .with_sample_count(self.samples)
            .with_x_range(self.xmin, self.xmax)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();
    let mut session = Session::new(cli.config());

    println!("scicalc [{}]", session.angle_mode());
    println!("Type expressions to evaluate, ':help' for commands, ':quit' to exit.");

    let mut rl = DefaultEditor::new()?;
    loop {
        let prompt = format!("{}> ", session.angle_mode());
        match rl.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line);
                if !run_line(&mut session, line) {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

/// Handle one input line, returns `false` when the user asked to quit
fn run_line(session: &mut Session, line: &str) -> bool {
    match line {
        ":quit" | ":q" | ":exit" => return false,
        ":help" => print_help(),
        ":deg" | ":rad" | ":mode" => {
            let wanted = match line {
                ":deg" => AngleMode::Degrees,
                ":rad" => AngleMode::Radians,
                _ => session.angle_mode().toggled(),
            };
            if session.angle_mode() != wanted {
                session.toggle_angle_mode();
            }
            println!("{}", session.angle_mode());
        }
        ":ans" => {
            session.clear();
            session.insert_last_answer();
            equals(session);
        }
        _ if line.starts_with(":plot") => plot(session, line[":plot".len()..].trim()),
        _ => {
            session.clear();
            session.push(line);
            equals(session);
        }
    }
    true
}

fn equals(session: &mut Session) {
    println!("{}", equals_line(session));
}

/// Evaluate the session buffer, and format the display followed by the cause
/// of a failure
fn equals_line(session: &mut Session) -> String {
    match session.equals() {
        Ok(_) => session.display().to_owned(),
        Err(err) => format!("{} ({})", session.display(), err),
    }
}

/// `:plot <expr> [xmin xmax]`
fn plot(session: &Session, arguments: &str) {
    let words: Vec<&str> = arguments.split_whitespace().collect();
    let bounds = match words.len() {
        n if n >= 3 => {
            let xmin = words[n - 2].parse::<f64>();
            let xmax = words[n - 1].parse::<f64>();
            match (xmin, xmax) {
                (Ok(xmin), Ok(xmax)) => Some((words[..n - 2].join(" "), xmin, xmax)),
                _ => None,
            }
        }
        _ => None,
    };
    let result = match bounds {
        Some((expression, xmin, xmax)) => session.plot(&expression, xmin, xmax),
        None => session.plot_default_range(arguments),
    };
    match result {
        Ok(plot) => print_plot(&plot),
        Err(err) => eprintln!("Error: {}", err),
    }
}

fn print_plot(plot: &Plot) {
    for sample in plot.samples() {
        match sample.y {
            Some(y) => println!("{:>12.6} {:>16.8}", sample.x, y),
            None => println!("{:>12.6} {:>16}", sample.x, "-"),
        }
    }
    let (ymin, ymax) = plot.y_range();
    println!(
        "y range [{:.6}, {:.6}], {} segment(s)",
        ymin,
        ymax,
        plot.segments().len()
    );
}

fn print_help() {
    println!("  <expression>              evaluate, e.g. 2 × sin(30) + 3!");
    println!("  :ans                      evaluate the last answer");
    println!("  :deg | :rad | :mode       set or toggle the angle mode");
    println!("  :plot <expr> [xmin xmax]  sample a function of x");
    println!("  :quit                     exit");
}
