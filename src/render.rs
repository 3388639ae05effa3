//! Presentation of unlocked ideas.
//!
//! The session never formats anything. Front ends pick a [`Render`]
//! implementation; [`PlainText`] is the one the terminal consumer uses.

use std::io::{self, Write};

use crate::ideas::Ideas;

pub trait Render {
    fn render(&self, ideas: &Ideas, out: &mut dyn Write) -> io::Result<()>;
}

/// One block per idea: date, title, description, tags.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainText;

impl Render for PlainText {
    fn render(&self, ideas: &Ideas, out: &mut dyn Write) -> io::Result<()> {
        if ideas.is_empty() {
            return writeln!(out, "No post ideas yet. Add some to your encrypted storage!");
        }

        for idea in ideas {
            writeln!(out, "[{}]", idea.date.as_deref().unwrap_or("No date"))?;
            writeln!(out, "{}", idea.title)?;
            if let Some(description) = idea.description.as_deref() {
                writeln!(out, "{description}")?;
            }
            if let Some(tags) = idea.tags.as_ref().filter(|tags| !tags.is_empty()) {
                writeln!(out, "Tags: {}", tags.join(", "))?;
            }
            writeln!(out)?;
        }
        Ok(())
    }
}
