use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("slide file {name:?} has no parseable slide number")]
    MalformedSlideId { name: String },

    #[error("failed to read slide directory {dir:?}")]
    Io {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One renderable unit of the deck. The slide number is only used for
/// ordering at load time; after that slides are addressed by deck index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlidePayload {
    Content { number: u32, path: PathBuf },
    Blank,
}

/// The full ordered sequence of slides, including the terminal blank.
/// Built once at startup, immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    slides: Vec<SlidePayload>,
}

impl Deck {
    /// Deck length including the terminal blank slide.
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    /// Number of real (non-blank) slides.
    pub fn real_count(&self) -> usize {
        self.slides.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&SlidePayload> {
        self.slides.get(index)
    }

    pub fn slides(&self) -> &[SlidePayload] {
        &self.slides
    }
}

const SLIDE_STEM_PREFIX: &str = "slide";

fn is_image_extension(ext: &str) -> bool {
    matches!(
        ext.to_lowercase().as_str(),
        "png" | "jpg" | "jpeg" | "bmp" | "gif"
    )
}

/// Extract the slide number from a file stem like "slide12". The prefix has
/// already been matched case-insensitively by the caller.
fn parse_slide_number(stem: &str) -> Result<u32, RegistryError> {
    stem[SLIDE_STEM_PREFIX.len()..]
        .parse::<u32>()
        .map_err(|_| RegistryError::MalformedSlideId {
            name: stem.to_string(),
        })
}

/// Enumerate candidate slide files in `dir`: image files whose stem starts
/// with "slide" (case-insensitive). Other files are not slides and are
/// ignored silently.
pub fn discover(dir: &Path) -> Result<Vec<(String, PathBuf)>, RegistryError> {
    let entries = fs::read_dir(dir).map_err(|e| RegistryError::Io {
        dir: dir.to_path_buf(),
        source: e,
    })?;

    let mut candidates = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| RegistryError::Io {
            dir: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        if !is_image_extension(ext) {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if stem.to_lowercase().starts_with(SLIDE_STEM_PREFIX) {
            candidates.push((stem.to_lowercase(), path));
        }
    }
    Ok(candidates)
}

/// Order candidates ascending by slide number and append the terminal blank
/// slide. Candidates with an unparseable number are skipped with a warning,
/// never fatal to the whole deck. Duplicate numbers keep the last-discovered
/// file.
pub fn build_deck(candidates: Vec<(String, PathBuf)>) -> Deck {
    let mut parsed: Vec<(u32, PathBuf)> = Vec::new();
    for (stem, path) in candidates {
        match parse_slide_number(&stem) {
            Ok(number) => parsed.push((number, path)),
            Err(e) => warn!("skipping slide file: {e}"),
        }
    }

    // Stable sort keeps discovery order among equal numbers, so the last
    // discovered duplicate ends up last and wins below.
    parsed.sort_by_key(|(number, _)| *number);

    let mut slides: Vec<SlidePayload> = Vec::new();
    for (number, path) in parsed {
        match slides.last_mut() {
            Some(SlidePayload::Content { number: prev, path: prev_path }) if *prev == number => {
                warn!(
                    "duplicate slide number {number}: {:?} replaces {:?}",
                    path, prev_path
                );
                *prev_path = path;
            }
            _ => slides.push(SlidePayload::Content { number, path }),
        }
    }

    for (index, slide) in slides.iter().enumerate() {
        if let SlidePayload::Content { number, path } = slide {
            info!("loaded slide {}: slide{} ({:?})", index + 1, number, path);
        }
    }

    slides.push(SlidePayload::Blank);
    Deck { slides }
}

/// Discover, order and finalize the deck from a slide directory.
pub fn load(dir: &Path) -> Result<Deck, RegistryError> {
    Ok(build_deck(discover(dir)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(stem: &str) -> (String, PathBuf) {
        (stem.to_string(), PathBuf::from(format!("{stem}.png")))
    }

    #[test]
    fn deck_is_sorted_by_slide_number() {
        let deck = build_deck(vec![
            candidate("slide3"),
            candidate("slide10"),
            candidate("slide1"),
        ]);

        let numbers: Vec<u32> = deck
            .slides()
            .iter()
            .filter_map(|s| match s {
                SlidePayload::Content { number, .. } => Some(*number),
                SlidePayload::Blank => None,
            })
            .collect();
        assert_eq!(numbers, vec![1, 3, 10]);
    }

    #[test]
    fn blank_slide_is_always_last() {
        let deck = build_deck(vec![candidate("slide2"), candidate("slide1")]);
        assert_eq!(deck.slides().last(), Some(&SlidePayload::Blank));
        assert_eq!(deck.len(), 3);
        assert_eq!(deck.real_count(), 2);

        let empty = build_deck(Vec::new());
        assert_eq!(empty.slides(), &[SlidePayload::Blank]);
        assert_eq!(empty.real_count(), 0);
    }

    #[test]
    fn malformed_slide_id_is_skipped() {
        let deck = build_deck(vec![
            candidate("slide1"),
            candidate("slide_final"),
            candidate("slide2"),
        ]);
        assert_eq!(deck.real_count(), 2);
    }

    #[test]
    fn duplicate_number_keeps_last_discovered() {
        let deck = build_deck(vec![
            (String::from("slide1"), PathBuf::from("a/slide1.png")),
            (String::from("slide1"), PathBuf::from("b/slide1.png")),
        ]);
        assert_eq!(
            deck.get(0),
            Some(&SlidePayload::Content {
                number: 1,
                path: PathBuf::from("b/slide1.png"),
            })
        );
        assert_eq!(deck.real_count(), 1);
    }

    #[test]
    fn parse_rejects_non_numeric_suffix() {
        assert!(parse_slide_number("slide7").is_ok());
        assert!(parse_slide_number("slidex").is_err());
        assert!(parse_slide_number("slide").is_err());
    }
}
