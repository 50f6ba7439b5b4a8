use crate::catalog::VocabFile;
use crate::style::decorate;
use crate::vocab::WordGroup;
use crossterm::style::{Color, Stylize};
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Everything the quiz and the results reporter tell the user
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    RoundStarted { round: usize, pending: usize },
    Prompt { category: String, text: String },
    Correct,
    Incorrect { missed: Vec<WordGroup> },
    /// A round's progress could not be written; the quiz goes on
    SaveFailed { reason: String },
    Completed,
    ModeFallback { input: String, fallback: String },
    Resumed { pending: usize },
    /// Saved progress was unreadable and is being ignored
    ProgressDiscarded { reason: String },
    Struggled { count: usize },
    Review { prompt: String, answers: String, attempts: u32 },
    RetryResult { correct: bool, answers: Vec<WordGroup> },
    ProgressCleared,
    ClearFailed { reason: String },
    /// Main menu header with the sets that have saved progress
    Welcome { in_progress: Vec<String> },
    ClearAllCancelled,
    AllProgressCleared { removed: bool },
    ClearAllFailed { reason: String },
    NoVocabFiles { dir: String },
    Folders { names: Vec<String> },
    VocabFiles { files: Vec<VocabFile> },
    Selected { name: String },
    InvalidChoice,
}

/// Interactive surface used by the quiz engine. Reads block the whole session.
pub trait Console {
    fn emit(&mut self, event: Event);

    /// Show `prompt` and return one line of input with surrounding whitespace removed.
    fn read_line(&mut self, prompt: &str) -> io::Result<String>;

    fn answer(&mut self, category: &str) -> io::Result<String> {
        self.read_line(&format!("{category} ➜ "))
    }

    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        let reply = self.read_line(&format!("{question} (y/n): "))?;
        Ok(reply.eq_ignore_ascii_case("y"))
    }
}

/// Line-oriented terminal console with colored output
pub struct TerminalConsole<R: BufRead, W: Write> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalConsole<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn render(&mut self, event: &Event) -> io::Result<()> {
        let out = &mut self.output;
        match event {
            Event::RoundStarted { round, pending } => writeln!(
                out,
                "\n--- {}: {pending} entry(ies) to review ---\n",
                format!("Round {round}").yellow()
            ),
            Event::Prompt { category, text } => {
                writeln!(out, "{category} ➜ {}", decorate(text, Color::Cyan))?;
                writeln!(out, "----------")
            }
            Event::Correct => writeln!(out, "{}\n", "✅ Correct!".green()),
            Event::Incorrect { missed } => {
                writeln!(out, "{}", "❌ Incorrect !!".red())?;
                for group in missed {
                    writeln!(
                        out,
                        "{}{}",
                        format!("Correct answer(s): {} ➜ ", group.category).red(),
                        decorate(&group.joined(), Color::Red)
                    )?;
                }
                writeln!(out)
            }
            Event::SaveFailed { reason } => {
                writeln!(out, "{}", format!("⚠️ Could not save progress: {reason}").yellow())
            }
            Event::Completed => {
                writeln!(out, "{}\n", "🎉 All entries answered correctly!".green())
            }
            Event::ModeFallback { input, fallback } => writeln!(
                out,
                "Invalid mode '{input}'. Defaulting to {fallback}."
            ),
            Event::Resumed { pending } => {
                writeln!(out, "Resuming previous session: {pending} entry(ies) pending.")
            }
            Event::ProgressDiscarded { reason } => writeln!(
                out,
                "{}",
                format!("⚠️ Saved progress is unreadable ({reason}). Starting fresh.").yellow()
            ),
            Event::Struggled { count } => writeln!(
                out,
                "{count} word(s) had multiple wrong attempts before being solved."
            ),
            Event::Review {
                prompt,
                answers,
                attempts,
            } => writeln!(
                out,
                "❌ {}{}{} | Attempts: {attempts}",
                decorate(prompt, Color::Cyan),
                " ➜ ".cyan(),
                decorate(answers, Color::Cyan)
            ),
            Event::RetryResult { correct: true, .. } => {
                writeln!(out, "{}\n", "✅ Correct!".green())
            }
            Event::RetryResult {
                correct: false,
                answers,
            } => {
                let joined = answers
                    .iter()
                    .map(WordGroup::joined)
                    .collect::<Vec<_>>()
                    .join(" / ");
                writeln!(
                    out,
                    "{}{}\n",
                    "❌ Still incorrect. The answer(s) are: ".red(),
                    decorate(&joined, Color::Red)
                )
            }
            Event::ProgressCleared => writeln!(out, "{}", "Progress cleared!".green()),
            Event::ClearFailed { reason } => {
                writeln!(out, "{}", format!("⚠️ Could not clear progress: {reason}").yellow())
            }
            Event::Welcome { in_progress } => {
                writeln!(out, "📘 Welcome to Vocab Drill")?;
                if in_progress.is_empty() {
                    return writeln!(out, "📂 No saved progress found.\n");
                }
                writeln!(out, "📦 {} vocab set(s) in progress:", in_progress.len())?;
                for name in in_progress {
                    writeln!(out, "  • {name}")?;
                }
                writeln!(out, "\n1. Start quiz\n2. Clear all saved progress")
            }
            Event::ClearAllCancelled => writeln!(out, "❌ Cancelled.\n"),
            Event::AllProgressCleared { removed: true } => {
                writeln!(out, "{}\n", "✅ All progress cleared.".green())
            }
            Event::AllProgressCleared { removed: false } => {
                writeln!(out, "ℹ️ No saved progress to delete.\n")
            }
            Event::ClearAllFailed { reason } => writeln!(out, "{}\n", format!("⚠️ {reason}").yellow()),
            Event::NoVocabFiles { dir } => {
                writeln!(out, "⚠️ No vocab files found in the '{dir}' directory.")
            }
            Event::Folders { names } => {
                writeln!(out, "\n📁 Available Folders:")?;
                for (i, name) in names.iter().enumerate() {
                    writeln!(out, "  [{i}] {name}")?;
                }
                Ok(())
            }
            Event::VocabFiles { files } => {
                writeln!(out, "\n📚 Vocabulary Files:")?;
                for (i, file) in files.iter().enumerate() {
                    let mut info = format!("🧠 {} words", file.words);
                    if let Some(pending) = file.pending {
                        info.push_str(&format!(" | 💾 {pending} pending"));
                    }
                    writeln!(out, "  [{i}] {} ({info})", file.name())?;
                }
                Ok(())
            }
            Event::Selected { name } => writeln!(out, "\n🔹 Selected: {name}\n"),
            Event::InvalidChoice => {
                writeln!(out, "{}", "❌ Invalid choice. Please enter a valid number.".red())
            }
        }
    }
}

impl<R: BufRead, W: Write> Console for TerminalConsole<R, W> {
    fn emit(&mut self, event: Event) {
        if let Err(e) = self.render(&event).and_then(|_| self.output.flush()) {
            tracing::warn!("failed to write to terminal: {e}");
        }
    }

    fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed",
            ));
        }
        Ok(line.trim().to_string())
    }
}

type Responder = Box<dyn FnMut(&[Event], &str) -> Option<String>>;

/// Console driven by a responder function, recording every event.
/// The responder sees the events so far and the question being asked;
/// returning `None` behaves like closed input.
pub struct ScriptedConsole {
    responder: Responder,
    pub events: Vec<Event>,
    pub questions: Vec<String>,
}

impl ScriptedConsole {
    pub fn new<F>(responder: F) -> Self
    where
        F: FnMut(&[Event], &str) -> Option<String> + 'static,
    {
        Self {
            responder: Box::new(responder),
            events: Vec::new(),
            questions: Vec::new(),
        }
    }

    /// Answer with the given lines in order
    pub fn with_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut queue: VecDeque<String> = lines.into_iter().map(Into::into).collect();
        Self::new(move |_, _| queue.pop_front())
    }

    /// Text of the most recent prompt shown
    pub fn last_prompt(events: &[Event]) -> Option<&str> {
        events.iter().rev().find_map(|e| match e {
            Event::Prompt { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn prompts(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Prompt { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Console for ScriptedConsole {
    fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        self.questions.push(prompt.to_string());
        (self.responder)(&self.events, prompt)
            .map(|line| line.trim().to_string())
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted"))
    }
}
