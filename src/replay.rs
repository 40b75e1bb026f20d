//! Recorded landmark streams.
//!
//! A recording is JSON lines, one line per detection cycle: either `null`
//! when no face was found, or an array of `{"x": .., "y": .., "z": ..}`
//! objects for the first detected face. Blank lines are skipped.
//!
//! Every frame is checked on the way in: coordinates must be finite, `x`
//! and `y` must lie in `[0, 1]`, and the frame must hold every landmark the
//! estimator is configured to read.

use crate::{
    config::LandmarkIndices,
    landmarks::{Landmark, LandmarkFrame},
    session::{Detection, LandmarkSource},
    Error, Result,
};
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

/// Parse one recording line; `Ok(None)` is a cycle without a face
///
/// # Errors
///
/// Returns `Error::FrameFormat` if the line is not valid JSON for a frame,
/// holds a non-finite or out-of-bounds coordinate, or has fewer than
/// `min_len` landmarks
pub fn parse_frame_line(line: &str, line_number: usize, min_len: usize) -> Result<Option<LandmarkFrame>> {
    let landmarks: Option<Vec<Landmark>> = serde_json::from_str(line).map_err(|e| Error::FrameFormat {
        line: line_number,
        message: e.to_string(),
    })?;

    landmarks
        .map(|landmarks| {
            LandmarkFrame::checked(landmarks, min_len).map_err(|e| Error::FrameFormat {
                line: line_number,
                message: e.to_string(),
            })
        })
        .transpose()
}

/// [`LandmarkSource`] replaying a JSON-lines recording
pub struct ReplaySource<R> {
    reader: R,
    line_number: usize,
    min_len: usize,
    buffer: Vec<u8>,
}

impl ReplaySource<BufReader<File>> {
    /// Open a recording file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::info!("Opening landmark recording: {}", path.display());
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> ReplaySource<R> {
    /// Replay from `reader`, expecting the default landmark topology
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
            min_len: LandmarkIndices::default().required_len(),
            buffer: Vec::new(),
        }
    }

    /// Require frames long enough for `indices` instead of the defaults
    #[must_use]
    pub fn with_indices(mut self, indices: &LandmarkIndices) -> Self {
        self.min_len = indices.required_len();
        self
    }

    /// Line number of the last line read, 1-based
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.line_number
    }
}

impl<R: BufRead + Send> LandmarkSource for ReplaySource<R> {
    fn next_detection(&mut self) -> Result<Detection> {
        loop {
            self.buffer.clear();
            if self.reader.read_until(b'\n', &mut self.buffer)? == 0 {
                return Ok(Detection::EndOfStream);
            }
            self.line_number += 1;

            let line = std::str::from_utf8(&self.buffer).map_err(|e| Error::FrameFormat {
                line: self.line_number,
                message: e.to_string(),
            })?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            return Ok(match parse_frame_line(line, self.line_number, self.min_len)? {
                Some(frame) => Detection::Face(frame),
                None => Detection::NoFace,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Indices that only need a single-landmark frame
    fn single_point() -> LandmarkIndices {
        LandmarkIndices {
            nose_tip: 0,
            forehead: 0,
            chin: 0,
            left_ear: 0,
            right_ear: 0,
        }
    }

    #[test]
    fn test_parse_null_line() {
        assert!(parse_frame_line("null", 1, 357).unwrap().is_none());
    }

    #[test]
    fn test_parse_frame_line() {
        let frame = parse_frame_line(r#"[{"x":0.5,"y":0.25,"z":-0.1}]"#, 1, 1).unwrap().unwrap();
        assert_eq!(frame.landmarks(), &[Landmark::new(0.5, 0.25, -0.1)]);
    }

    #[test]
    fn test_parse_errors_carry_line_number() {
        match parse_frame_line("{not json", 7, 1) {
            Err(Error::FrameFormat { line, .. }) => assert_eq!(line, 7),
            other => panic!("Expected FrameFormat, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_out_of_bounds() {
        match parse_frame_line(r#"[{"x":5.0,"y":-3.0,"z":0.0}]"#, 4, 1) {
            Err(Error::FrameFormat { line, message }) => {
                assert_eq!(line, 4);
                assert!(message.contains("outside normalized image space"), "{message}");
            }
            other => panic!("Expected FrameFormat, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_short_frame() {
        match parse_frame_line(r#"[{"x":0.5,"y":0.5}]"#, 2, 357) {
            Err(Error::FrameFormat { message, .. }) => assert!(message.contains("Landmark 356 missing"), "{message}"),
            other => panic!("Expected FrameFormat, got {other:?}"),
        }
    }

    #[test]
    fn test_replay_sequence() {
        let recording = "null\n\n[{\"x\":0.1,\"y\":0.2,\"z\":0.0}]\n";
        let mut source = ReplaySource::new(Cursor::new(recording)).with_indices(&single_point());

        assert_eq!(source.next_detection().unwrap(), Detection::NoFace);
        match source.next_detection().unwrap() {
            Detection::Face(frame) => assert_eq!(frame.len(), 1),
            other => panic!("Expected a face, got {other:?}"),
        }
        assert_eq!(source.line_number(), 3);
        assert_eq!(source.next_detection().unwrap(), Detection::EndOfStream);
    }

    #[test]
    fn test_invalid_utf8_line_is_a_frame_error() {
        let mut source = ReplaySource::new(Cursor::new(b"null\n\xff\xfe\nnull\n".to_vec()));

        assert_eq!(source.next_detection().unwrap(), Detection::NoFace);
        match source.next_detection() {
            Err(Error::FrameFormat { line, .. }) => assert_eq!(line, 2),
            other => panic!("Expected FrameFormat, got {other:?}"),
        }
        assert_eq!(source.next_detection().unwrap(), Detection::NoFace);
        assert_eq!(source.line_number(), 3);
    }
}
