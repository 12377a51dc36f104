use std::io::{self, BufRead, Write};

use policy_spec::fields::fields_for_step;
use policy_spec::{
    AnswersRecord, DraftStore, FieldKind, FieldSpec, FormSession, Requirement, StepError, StepId,
    ValidationResult, summarize,
};
use serde_json::Value;

/// Controls which bits of state the wizard prints.
#[derive(Copy, Clone, Eq, PartialEq)]
pub enum Verbosity {
    /// Clean output: step headers and prompts only.
    Clean,
    /// Verbose output: progress, visible fields, draft status.
    Verbose,
}

impl Verbosity {
    pub fn from_verbose(verbose: bool) -> Self {
        if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Clean
        }
    }

    pub fn is_verbose(&self) -> bool {
        matches!(self, Verbosity::Verbose)
    }
}

#[derive(Debug)]
pub enum WizardOutcome {
    Submitted(AnswersRecord),
    Aborted,
}

/// Error produced when parsing answers from the user.
#[derive(Debug)]
pub struct AnswerParseError {
    pub user_message: String,
    pub debug_message: Option<String>,
}

impl AnswerParseError {
    pub fn new(user_message: impl Into<String>, debug_message: Option<String>) -> Self {
        Self {
            user_message: user_message.into(),
            debug_message,
        }
    }
}

/// What the user typed at a field prompt.
#[derive(Debug, PartialEq)]
enum Reply {
    Keep,
    Set(Value),
    Back,
    Exit,
}

enum Flow {
    Continue,
    Back,
    Exit,
}

enum Review {
    Submitted(AnswersRecord),
    Continue,
    Exit,
}

const HELP: &str = "Press enter to keep the shown value, '-' to clear text, 'back' for the previous step, 'exit' to stop.";

/// Terminal front end over a [`FormSession`].
pub struct Wizard<S, R, W> {
    session: FormSession<S>,
    input: R,
    output: W,
    verbosity: Verbosity,
}

impl<S: DraftStore, R: BufRead, W: Write> Wizard<S, R, W> {
    pub fn new(session: FormSession<S>, input: R, output: W, verbosity: Verbosity) -> Self {
        Self {
            session,
            input,
            output,
            verbosity,
        }
    }

    pub fn into_session(self) -> FormSession<S> {
        self.session
    }

    pub fn run(&mut self) -> io::Result<WizardOutcome> {
        self.show_header()?;
        loop {
            let step = self.session.active_step();
            self.show_step(step)?;

            match self.ask_step(step)? {
                Flow::Continue => {}
                Flow::Back => {
                    self.go_back()?;
                    continue;
                }
                Flow::Exit => return self.abort(),
            }

            if step.is_terminal() {
                self.show_summary()?;
                match self.review_command()? {
                    Review::Submitted(answers) => return Ok(WizardOutcome::Submitted(answers)),
                    Review::Exit => return self.abort(),
                    Review::Continue => {}
                }
            } else if let Err(err) = self.session.next() {
                self.show_step_error(&err)?;
            }
            self.session.tick();
        }
    }

    fn ask_step(&mut self, step: StepId) -> io::Result<Flow> {
        for spec in fields_for_step(step) {
            // Visibility can change with every answer in the step.
            if !self.session.visibility().get(spec.id).copied().unwrap_or(true) {
                continue;
            }
            loop {
                let current = self.session.answers().get(spec.id).unwrap_or(Value::Null);
                self.show_prompt(spec, &current)?;
                let Some(line) = self.read_line()? else {
                    return Ok(Flow::Exit);
                };
                match parse_reply(spec, &line) {
                    Ok(Reply::Keep) => break,
                    Ok(Reply::Set(value)) => {
                        if let Err(err) = self.session.set_field(spec.id, value) {
                            writeln!(self.output, "Invalid answer: {err}")?;
                            continue;
                        }
                        self.session.tick();
                        break;
                    }
                    Ok(Reply::Back) => return Ok(Flow::Back),
                    Ok(Reply::Exit) => return Ok(Flow::Exit),
                    Err(err) => self.show_parse_error(&err)?,
                }
            }
        }
        Ok(Flow::Continue)
    }

    fn review_command(&mut self) -> io::Result<Review> {
        loop {
            writeln!(
                self.output,
                "Type 'submit' to generate the policy, 'edit <step>' to change a section, 'back' or 'exit'."
            )?;
            write!(self.output, "> ")?;
            self.output.flush()?;
            let Some(line) = self.read_line()? else {
                return Ok(Review::Exit);
            };
            let line = line.to_lowercase();
            match line.split_once(' ') {
                None if line == "submit" => {
                    return match self.session.submit() {
                        Ok(answers) => {
                            writeln!(self.output, "Form submitted.")?;
                            Ok(Review::Submitted(answers))
                        }
                        Err(err) => {
                            self.show_step_error(&err)?;
                            Ok(Review::Continue)
                        }
                    };
                }
                None if line == "back" => {
                    self.go_back()?;
                    return Ok(Review::Continue);
                }
                None if line == "exit" => return Ok(Review::Exit),
                Some(("edit", target)) => match target.trim().parse::<StepId>() {
                    Ok(step) => match self.session.jump_to(step) {
                        Ok(()) => return Ok(Review::Continue),
                        Err(err) => writeln!(self.output, "{err}")?,
                    },
                    Err(err) => writeln!(self.output, "{err}")?,
                },
                _ => writeln!(self.output, "Unknown command '{line}'.")?,
            }
        }
    }

    fn go_back(&mut self) -> io::Result<()> {
        if let Err(err) = self.session.previous() {
            writeln!(self.output, "{err}")?;
        }
        Ok(())
    }

    fn abort(&mut self) -> io::Result<WizardOutcome> {
        self.session.flush_draft();
        writeln!(self.output, "Progress saved; run the wizard again to resume.")?;
        Ok(WizardOutcome::Aborted)
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn show_header(&mut self) -> io::Result<()> {
        writeln!(self.output, "Privacy Policy Generator")?;
        if *self.session.answers() != AnswersRecord::default() {
            writeln!(self.output, "Resuming your saved draft.")?;
        }
        writeln!(self.output, "{HELP}")
    }

    fn show_step(&mut self, step: StepId) -> io::Result<()> {
        writeln!(self.output)?;
        writeln!(
            self.output,
            "Step {}/{}: {}",
            step.index() + 1,
            StepId::ORDER.len(),
            step.title()
        )?;
        if self.verbosity.is_verbose() {
            let progress = self.session.progress();
            writeln!(
                self.output,
                "Progress: {}/{} steps ({}%)",
                progress.completed, progress.total, progress.percent
            )?;
            let visible = self
                .session
                .visible_fields()
                .iter()
                .map(|spec| spec.id)
                .collect::<Vec<_>>();
            writeln!(self.output, "Visible fields: {}", visible.join(", "))?;
            if self.session.autosaver().last_saved().is_some() {
                writeln!(self.output, "Draft saved.")?;
            }
        }
        Ok(())
    }

    fn show_prompt(&mut self, spec: &FieldSpec, current: &Value) -> io::Result<()> {
        let mut line = spec.title.to_string();
        if spec.required != Requirement::Never {
            line.push_str(" *");
        }
        if spec.kind == FieldKind::Boolean {
            line.push_str(" (y/n)");
        }
        match current {
            Value::Bool(flag) => line.push_str(if *flag { " [Y]" } else { " [N]" }),
            Value::String(text) if !text.is_empty() => {
                line.push_str(&format!(" [{text}]"));
            }
            _ => {}
        }
        write!(self.output, "{line}: ")?;
        self.output.flush()
    }

    fn show_parse_error(&mut self, error: &AnswerParseError) -> io::Result<()> {
        writeln!(self.output, "Invalid answer: {}", error.user_message)?;
        if self.verbosity.is_verbose()
            && let Some(debug) = &error.debug_message
        {
            writeln!(self.output, "  Expected: {debug}")?;
        }
        Ok(())
    }

    fn show_step_error(&mut self, error: &StepError) -> io::Result<()> {
        match error.validation() {
            Some(result) => {
                if let StepError::Invalid { step, .. } = error {
                    writeln!(self.output, "Please fix the {} step:", step.title())?;
                }
                describe_errors(&mut self.output, result)
            }
            None => writeln!(self.output, "{error}"),
        }
    }

    fn show_summary(&mut self) -> io::Result<()> {
        for section in summarize(self.session.answers()) {
            writeln!(self.output, "{} (edit {})", section.title, section.step)?;
            for entry in &section.entries {
                writeln!(self.output, "  {}: {}", entry.label, entry.value)?;
            }
        }
        Ok(())
    }
}

pub fn describe_errors(output: &mut impl Write, result: &ValidationResult) -> io::Result<()> {
    for error in &result.errors {
        writeln!(output, "  {} - {}", error.field, error.message)?;
    }
    Ok(())
}

fn parse_reply(spec: &FieldSpec, raw: &str) -> Result<Reply, AnswerParseError> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("exit") {
        return Ok(Reply::Exit);
    }
    if trimmed.eq_ignore_ascii_case("back") {
        return Ok(Reply::Back);
    }
    if trimmed.is_empty() {
        return Ok(Reply::Keep);
    }
    match spec.kind {
        FieldKind::Boolean => parse_boolean(trimmed).map(Reply::Set),
        _ if trimmed == "-" => Ok(Reply::Set(Value::String(String::new()))),
        _ => {
            if let Some((pattern, message)) = spec.format()
                && !pattern.is_match(trimmed)
            {
                return Err(AnswerParseError::new(
                    message,
                    Some(format!("expected {}", spec.kind.label())),
                ));
            }
            Ok(Reply::Set(Value::String(trimmed.to_string())))
        }
    }
}

fn parse_boolean(raw: &str) -> Result<Value, AnswerParseError> {
    match raw.to_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "1" => Ok(Value::Bool(true)),
        "false" | "f" | "no" | "n" | "0" => Ok(Value::Bool(false)),
        _ => Err(AnswerParseError::new(
            "Please enter yes or no.",
            Some("expected boolean (y/n/true/false)".to_string()),
        )),
    }
}
