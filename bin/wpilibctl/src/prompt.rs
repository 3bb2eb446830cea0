//! ---
//! wpi_section: "05-cli"
//! wpi_subsection: "binary"
//! wpi_type: "source"
//! wpi_scope: "code"
//! wpi_description: "Control CLI for WPILib workspace preferences."
//! wpi_version: "v0.0.0-prealpha"
//! wpi_owner: "tbd"
//! ---
//! Terminal implementation of the preferences prompts.

use std::io::{self, BufRead, BufReader, Write};

use async_trait::async_trait;
use parking_lot::Mutex;
use wpilib_logging::wpi_warn;
use wpilib_prefs::Prompter;

/// Line-oriented prompter. End of input dismisses the prompt.
pub struct StdinPrompter<R, W> {
    input: Mutex<R>,
    output: Mutex<W>,
}

impl StdinPrompter<BufReader<io::Stdin>, io::Stdout> {
    /// Prompter over the process stdin and stdout.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stdout())
    }
}

impl<R, W> StdinPrompter<R, W>
where
    R: BufRead + Send,
    W: Write + Send,
{
    pub fn new(input: R, output: W) -> Self {
        Self {
            input: Mutex::new(input),
            output: Mutex::new(output),
        }
    }

    fn write_prompt(&self, text: &str) -> io::Result<()> {
        let mut output = self.output.lock();
        write!(output, "{}", text)?;
        output.flush()
    }

    /// Next trimmed line; `None` on end of input or read failure.
    fn read_line(&self) -> Option<String> {
        let mut line = String::new();
        match self.input.lock().read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim().to_owned()),
            Err(err) => {
                wpi_warn!("failed to read response from stdin: {}", err);
                None
            }
        }
    }

    fn ask(&self, text: &str) -> Option<String> {
        if let Err(err) = self.write_prompt(text) {
            wpi_warn!("failed to write prompt: {}", err);
            return None;
        }
        self.read_line()
    }
}

#[async_trait]
impl<R, W> Prompter for StdinPrompter<R, W>
where
    R: BufRead + Send,
    W: Write + Send,
{
    async fn input_box(&self, prompt: &str) -> Option<String> {
        self.ask(&format!("{}: ", prompt))
    }

    async fn information_message(&self, message: &str, choices: &[&str]) -> Option<String> {
        let mut menu = format!("{}\n", message);
        for (idx, choice) in choices.iter().enumerate() {
            menu.push_str(&format!("  {}. {}\n", idx + 1, choice));
        }
        menu.push_str("Select option (blank to dismiss): ");
        loop {
            let answer = self.ask(&menu)?;
            if answer.is_empty() {
                return None;
            }
            match answer.parse::<usize>() {
                Ok(value) if (1..=choices.len()).contains(&value) => {
                    return Some(choices[value - 1].to_owned())
                }
                _ => {
                    if let Err(err) = self.write_prompt(&format!(
                        "Enter a number between 1 and {}.\n",
                        choices.len()
                    )) {
                        wpi_warn!("failed to write prompt: {}", err);
                        return None;
                    }
                }
            }
        }
    }
}
