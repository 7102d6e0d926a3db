//! The `iqplace quiz` command.
//!
//! Runs one interactive session over a line-oriented console: the quiz, the
//! score, then any number of placement predictions and retakes. Records are
//! exported when the session ends (on `q` or end of input).

use std::fmt::Display;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Result;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use iqplace_core::bank::{load_bank, QuestionBank};
use iqplace_core::interpretation::{recommendations, IqBand};
use iqplace_core::model::{AcademicProfile, Branch, PlacementStatus, ScoreResult, Year};
use iqplace_core::session::AnswerOutcome;
use iqplace_core::traits::{PlacementPredictor, CGPA_MAX};
use iqplace_core::Session;
use iqplace_predictors::config::load_config_from;
use iqplace_predictors::resolve_predictor;
use iqplace_report::{export_session, parse_formats};

use super::summary::summary_table;

pub struct QuizArgs {
    pub bank: Option<PathBuf>,
    pub per_category: Option<usize>,
    pub seed: Option<u64>,
    pub predictor: Option<String>,
    pub config: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub format: String,
}

pub async fn execute(args: QuizArgs) -> Result<()> {
    let config = load_config_from(args.config.as_deref())?;
    let per_category = args.per_category.unwrap_or(config.per_category);
    anyhow::ensure!(per_category >= 1, "per-category must be at least 1");
    let formats = parse_formats(&args.format)?;

    let bank = match &args.bank {
        Some(path) => load_bank(path)?,
        None => QuestionBank::builtin()?,
    };
    let predictor = resolve_predictor(&config, args.predictor.as_deref())?;
    let output_dir = args.output.unwrap_or_else(|| config.output_dir.clone());

    let mut rng = match args.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut console = Console::new(stdin.lock(), stdout.lock());
    let session = run_session(
        &mut console,
        &bank,
        per_category,
        &mut rng,
        predictor.as_ref(),
    )
    .await?;

    if session.records().is_empty() {
        println!("\nNo predictions recorded; nothing to export.");
        return Ok(());
    }

    println!("\n{}", summary_table(&session.summary()));

    // Export failures are reported but do not fail the session
    match export_session(&session.report(), &output_dir, &formats) {
        Ok(paths) => {
            for path in paths {
                println!("Saved: {}", path.display());
            }
        }
        Err(e) => {
            tracing::warn!("export failed: {e}");
            eprintln!("Export failed: {e}");
        }
    }

    Ok(())
}

/// Line-oriented prompt/answer I/O.
pub struct Console<R, W> {
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, out: W) -> Self {
        Self { input, out }
    }

    /// Print a prompt and read one trimmed line. `None` at end of input.
    fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.out, "{prompt}")?;
        self.out.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.out)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Ask until `parse` accepts the answer.
    fn ask_until<T>(
        &mut self,
        prompt: &str,
        mut parse: impl FnMut(&str) -> Result<T, String>,
    ) -> Result<Option<T>> {
        loop {
            let Some(line) = self.ask(prompt)? else {
                return Ok(None);
            };
            match parse(&line) {
                Ok(value) => return Ok(Some(value)),
                Err(msg) => writeln!(self.out, "  {msg}")?,
            }
        }
    }

    /// Pick one of `options` by 1-based number or by name.
    fn choose<T>(&mut self, label: &str, options: &[T], default: Option<T>) -> Result<Option<T>>
    where
        T: Copy + Display + FromStr<Err = String>,
    {
        writeln!(self.out, "{label}:")?;
        for (i, option) in options.iter().enumerate() {
            writeln!(self.out, "  {}) {option}", i + 1)?;
        }
        let prompt = match default {
            Some(d) => format!("Choice (default {d}): "),
            None => "Choice: ".to_string(),
        };
        self.ask_until(&prompt, |line| {
            if line.is_empty() {
                return default.ok_or_else(|| "Please make a choice.".to_string());
            }
            if let Ok(n) = line.parse::<usize>() {
                return n
                    .checked_sub(1)
                    .and_then(|i| options.get(i).copied())
                    .ok_or_else(|| format!("Enter a number between 1 and {}.", options.len()));
            }
            line.parse()
        })
    }
}

enum NextStep {
    PredictAgain,
    Retake,
    Quit,
}

/// Drive one interactive session to completion and return it.
pub async fn run_session<R, W, G>(
    console: &mut Console<R, W>,
    bank: &QuestionBank,
    per_category: usize,
    rng: &mut G,
    predictor: &dyn PlacementPredictor,
) -> Result<Session>
where
    R: BufRead,
    W: Write,
    G: Rng + ?Sized,
{
    let mut session = Session::new();
    writeln!(
        console.out,
        "IQ test: {} (predictor: {})",
        bank.name,
        predictor.name()
    )?;

    'quiz: loop {
        session.start_quiz(bank, per_category, rng)?;
        let Some(score) = take_quiz(console, &mut session)? else {
            break;
        };
        print_score(console, &score)?;

        loop {
            let Some(profile) = read_profile(console)? else {
                break 'quiz;
            };

            match session.request_prediction(predictor, &profile).await {
                Ok((result, _)) => {
                    writeln!(
                        console.out,
                        "\nPrediction: {} ({:.1}% confidence)",
                        result.placement,
                        result.confidence * 100.0
                    )?;
                    writeln!(console.out, "Key factor: {}", result.dominant_factor)?;
                    writeln!(console.out, "Recommendations:")?;
                    for tip in recommendations(&result) {
                        writeln!(console.out, "  - {tip}")?;
                    }
                    writeln!(
                        console.out,
                        "Prediction saved! Total records: {}",
                        session.records().len()
                    )?;
                }
                Err(e) if e.is_precondition() => return Err(e.into()),
                Err(e) => writeln!(console.out, "\n{e}")?,
            }

            match ask_next_step(console)? {
                NextStep::PredictAgain => continue,
                NextStep::Retake => {
                    session.retake();
                    continue 'quiz;
                }
                NextStep::Quit => break 'quiz,
            }
        }
    }

    Ok(session)
}

/// Present questions until the quiz is scored. `None` if input ran out.
fn take_quiz<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    session: &mut Session,
) -> Result<Option<ScoreResult>> {
    loop {
        let (Some(item), Some(progress)) = (session.current_item(), session.progress()) else {
            return Ok(session.score());
        };
        writeln!(
            console.out,
            "\nQuestion {}/{} [{}] ({})",
            progress.answered + 1,
            progress.total,
            item.category,
            item.difficulty()
        )?;
        writeln!(console.out, "{}", item.question.prompt)?;
        for (i, option) in item.question.options.iter().enumerate() {
            writeln!(console.out, "  {}) {option}", i + 1)?;
        }
        let count = item.option_count();

        let choice = console.ask_until("Answer: ", |line| {
            line.parse::<usize>()
                .ok()
                .filter(|n| (1..=count).contains(n))
                .map(|n| n - 1)
                .ok_or_else(|| format!("Enter a number between 1 and {count}."))
        })?;
        let Some(choice) = choice else {
            return Ok(None);
        };

        if let AnswerOutcome::Completed(result) = session.submit_answer(choice)? {
            return Ok(Some(result));
        }
    }
}

fn print_score<R, W: Write>(console: &mut Console<R, W>, score: &ScoreResult) -> Result<()> {
    writeln!(console.out, "\nYour IQ Score: {:.1}", score.iq_score)?;
    writeln!(console.out, "{}", IqBand::from_score(score.iq_score))?;
    writeln!(
        console.out,
        "Correct: {}/{} ({:.1}% accuracy)",
        score.correct_count,
        score.total,
        score.accuracy() * 100.0
    )?;
    Ok(())
}

fn read_profile<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
) -> Result<Option<AcademicProfile>> {
    writeln!(console.out, "\nPlacement prediction")?;
    let cgpa = console.ask_until(&format!("CGPA (0-{CGPA_MAX}): "), |line| {
        line.parse::<f64>()
            .ok()
            .filter(|c| (0.0..=CGPA_MAX).contains(c))
            .ok_or_else(|| format!("Enter a number between 0 and {CGPA_MAX}."))
    })?;
    let Some(cgpa) = cgpa else {
        return Ok(None);
    };
    let Some(branch) = console.choose("Branch", &Branch::ALL, None)? else {
        return Ok(None);
    };
    let Some(year) = console.choose("Year", &Year::ALL, None)? else {
        return Ok(None);
    };
    let statuses = [
        PlacementStatus::Placed,
        PlacementStatus::NotPlaced,
        PlacementStatus::Undecided,
    ];
    let Some(status) = console.choose(
        "Current placement status",
        &statuses,
        Some(PlacementStatus::Undecided),
    )?
    else {
        return Ok(None);
    };

    Ok(Some(AcademicProfile {
        cgpa,
        branch,
        year,
        status,
    }))
}

fn ask_next_step<R: BufRead, W: Write>(console: &mut Console<R, W>) -> Result<NextStep> {
    let step = console.ask_until(
        "\nWhat next? [p]redict again, [r]etake quiz, [q]uit (default q): ",
        |line| match line.to_ascii_lowercase().as_str() {
            "" | "q" | "quit" => Ok(NextStep::Quit),
            "p" | "predict" => Ok(NextStep::PredictAgain),
            "r" | "retake" => Ok(NextStep::Retake),
            _ => Err("Enter p, r or q.".to_string()),
        },
    )?;
    Ok(step.unwrap_or(NextStep::Quit))
}
