//! Interaction steps: parsed from `--step` flags or a JSON script file.

use anyhow::{Context as _, Result, anyhow, bail};
use core::str::FromStr;
use genz::{Genz, Host};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// One simulated interaction, addressed by selector.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Step {
    Click { selector: String },
    Input { selector: String, text: String },
    Check {
        selector: String,
        #[serde(default = "checked_default")]
        checked: bool,
    },
    Uncheck { selector: String },
    Enter { selector: String },
    Leave { selector: String },
}

const fn checked_default() -> bool {
    true
}

impl Step {
    pub fn selector(&self) -> &str {
        match self {
            Self::Click { selector }
            | Self::Input { selector, .. }
            | Self::Check { selector, .. }
            | Self::Uncheck { selector }
            | Self::Enter { selector }
            | Self::Leave { selector } => selector,
        }
    }

    /// Perform the step against the first element matching its selector.
    ///
    /// # Errors
    /// Returns an error if the selector matches nothing.
    pub fn apply<H: Host>(&self, genz: &mut Genz<H>) -> Result<()> {
        let node = genz
            .query(self.selector())
            .ok_or_else(|| anyhow!("no element matches {:?}", self.selector()))?;
        match self {
            Self::Click { .. } => genz.click(node),
            Self::Input { text, .. } => genz.input(node, text),
            Self::Check { checked, .. } => genz.set_checked(node, *checked),
            Self::Uncheck { .. } => genz.set_checked(node, false),
            Self::Enter { .. } => genz.pointer_enter(node),
            Self::Leave { .. } => genz.pointer_leave(node),
        }
        Ok(())
    }
}

impl FromStr for Step {
    type Err = anyhow::Error;

    /// `click:<selector>`, `input:<selector>=<text>`, `check:<selector>`,
    /// `uncheck:<selector>`, `enter:<selector>` or `leave:<selector>`.
    fn from_str(s: &str) -> Result<Self> {
        let (action, rest) = s
            .split_once(':')
            .ok_or_else(|| anyhow!("expected `action:selector`, found {s:?}"))?;
        let selector = rest.trim().to_owned();
        if selector.is_empty() {
            bail!("missing selector in {s:?}");
        }
        Ok(match action.trim() {
            "click" => Self::Click { selector },
            "input" => {
                let at = value_separator(rest)
                    .ok_or_else(|| anyhow!("expected `input:selector=text`, found {s:?}"))?;
                Self::Input {
                    selector: rest[..at].trim().to_owned(),
                    text: rest[at + 1..].to_owned(),
                }
            }
            "check" => Self::Check {
                selector,
                checked: true,
            },
            "uncheck" => Self::Uncheck { selector },
            "enter" => Self::Enter { selector },
            "leave" => Self::Leave { selector },
            other => bail!("unknown action {other:?}"),
        })
    }
}

/// Index of the first `=` outside an attribute selector.
fn value_separator(text: &str) -> Option<usize> {
    let mut depth = 0_usize;
    for (at, ch) in text.char_indices() {
        match ch {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            '=' if depth == 0 => return Some(at),
            _ => {}
        }
    }
    None
}

/// Read a JSON array of steps.
///
/// # Errors
/// Returns an error if the file cannot be read or is not a step array.
pub fn load_script(path: &Path) -> Result<Vec<Step>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read script {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid script {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn parses_step_flags() -> Result<()> {
        assert_eq!(
            "click:#inc".parse::<Step>()?,
            Step::Click {
                selector: String::from("#inc"),
            }
        );
        assert_eq!(
            "input:[name=user]=a=b".parse::<Step>()?,
            Step::Input {
                selector: String::from("[name=user]"),
                text: String::from("a=b"),
            }
        );
        assert_eq!(
            "input:#name=".parse::<Step>()?,
            Step::Input {
                selector: String::from("#name"),
                text: String::new(),
            }
        );
        assert!("click".parse::<Step>().is_err());
        assert!("input:#name".parse::<Step>().is_err());
        assert!("drag:#x".parse::<Step>().is_err());
        assert!("enter:".parse::<Step>().is_err());
        Ok(())
    }

    #[test]
    fn loads_script_file() -> Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        write!(
            file,
            r##"[
                {{"action": "click", "selector": "#inc"}},
                {{"action": "input", "selector": "#name", "text": "Ada"}},
                {{"action": "check", "selector": "#agree"}},
                {{"action": "check", "selector": "#agree", "checked": false}},
                {{"action": "leave", "selector": ".card"}}
            ]"##
        )?;
        let steps = load_script(file.path())?;
        assert_eq!(steps.len(), 5);
        assert_eq!(
            steps[2],
            Step::Check {
                selector: String::from("#agree"),
                checked: true,
            }
        );
        assert_eq!(
            steps[3],
            Step::Check {
                selector: String::from("#agree"),
                checked: false,
            }
        );
        assert_eq!(steps[4].selector(), ".card");
        Ok(())
    }

    #[test]
    fn rejects_bad_script() -> Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        write!(file, r##"[{{"action": "fly", "selector": "#x"}}]"##)?;
        assert!(load_script(file.path()).is_err());
        Ok(())
    }
}
