//! Example strings for pattern schemas.

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use regex::Regex;
use regex_syntax::hir::{Class, ClassBytes, ClassUnicode, Hir, HirKind, Literal};

use crate::error::FixtureError;

/// How many repetitions an unbounded `*`/`+`/`{n,}` may add beyond its minimum.
pub const DEFAULT_MAX_REPEAT: u32 = 3;

/// Produces one string matching a pattern.
///
/// The fixture generator asks for an example whenever it meets a
/// [`crate::Schema::Pattern`]. Implement this to plug in a different
/// example backend, or to return canned strings in tests.
pub trait PatternExamples {
    fn example(&mut self, pattern: &Regex, rng: &mut dyn RngCore) -> Result<String, FixtureError>;
}

/// Generates examples by walking the pattern's syntax tree.
///
/// Look-around assertions (`\A`, `^`, `\b`, ...) emit nothing, alternations
/// pick one branch, classes pick one member uniformly, and unbounded
/// repetitions are capped at `min + max_repeat`.
///
/// # Example
///
/// ```rust
/// use conform::fixture::{HirExamples, PatternExamples};
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
/// use regex::Regex;
///
/// let pattern = Regex::new(r"\A[a-c]{2}-\d\z").unwrap();
/// let mut rng = StdRng::seed_from_u64(7);
/// let example = HirExamples::new().example(&pattern, &mut rng).unwrap();
///
/// assert!(pattern.is_match(&example));
/// ```
#[derive(Debug, Clone)]
pub struct HirExamples {
    max_repeat: u32,
}

impl HirExamples {
    pub fn new() -> Self {
        Self {
            max_repeat: DEFAULT_MAX_REPEAT,
        }
    }

    pub fn with_max_repeat(mut self, max_repeat: u32) -> Self {
        self.max_repeat = max_repeat;
        self
    }

    fn emit(&self, hir: &Hir, rng: &mut dyn RngCore, out: &mut Vec<u8>) {
        match hir.kind() {
            HirKind::Empty | HirKind::Look(_) => {}
            HirKind::Literal(Literal(bytes)) => out.extend_from_slice(bytes),
            HirKind::Class(Class::Unicode(class)) => {
                if let Some(c) = pick_char(class, rng) {
                    let mut buf = [0u8; 4];
                    out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
                }
            }
            HirKind::Class(Class::Bytes(class)) => {
                if let Some(b) = pick_byte(class, rng) {
                    out.push(b);
                }
            }
            HirKind::Repetition(rep) => {
                let max = rep
                    .max
                    .unwrap_or_else(|| rep.min.saturating_add(self.max_repeat))
                    .max(rep.min);
                let count = rng.gen_range(rep.min..=max);
                for _ in 0..count {
                    self.emit(&rep.sub, rng, out);
                }
            }
            HirKind::Capture(capture) => self.emit(&capture.sub, rng, out),
            HirKind::Concat(parts) => {
                for part in parts {
                    self.emit(part, rng, out);
                }
            }
            HirKind::Alternation(branches) => {
                if let Some(branch) = branches.choose(&mut *rng) {
                    self.emit(branch, rng, out);
                }
            }
        }
    }
}

impl Default for HirExamples {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternExamples for HirExamples {
    fn example(&mut self, pattern: &Regex, rng: &mut dyn RngCore) -> Result<String, FixtureError> {
        let hir = regex_syntax::Parser::new()
            .parse(pattern.as_str())
            .map_err(|e| FixtureError::Pattern {
                pattern: pattern.as_str().to_string(),
                reason: e.to_string(),
            })?;
        let mut out = Vec::new();
        self.emit(&hir, rng, &mut out);
        Ok(String::from_utf8_lossy(&out).into_owned())
    }
}

fn pick_char(class: &ClassUnicode, rng: &mut dyn RngCore) -> Option<char> {
    let total: u64 = class
        .ranges()
        .iter()
        .map(|r| u64::from(r.end() as u32 - r.start() as u32) + 1)
        .sum();
    if total == 0 {
        return None;
    }
    let mut offset = rng.gen_range(0..total);
    for range in class.ranges() {
        let width = u64::from(range.end() as u32 - range.start() as u32) + 1;
        if offset < width {
            // the offset may land in the surrogate gap of a wide range
            let code = range.start() as u32 + offset as u32;
            return Some(char::from_u32(code).unwrap_or(range.start()));
        }
        offset -= width;
    }
    None
}

fn pick_byte(class: &ClassBytes, rng: &mut dyn RngCore) -> Option<u8> {
    let total: u32 = class
        .ranges()
        .iter()
        .map(|r| u32::from(r.end() - r.start()) + 1)
        .sum();
    if total == 0 {
        return None;
    }
    let mut offset = rng.gen_range(0..total);
    for range in class.ranges() {
        let width = u32::from(range.end() - range.start()) + 1;
        if offset < width {
            return Some(range.start() + offset as u8);
        }
        offset -= width;
    }
    None
}
