use crate::error::InputError;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor};
use std::path::PathBuf;
use tracing::warn;

/// Where lines come from.
#[derive(Debug, Clone, PartialEq)]
pub enum InputSource {
    /// A literal argument; embedded newlines split it into several lines.
    Text(String),
    Stdin,
    File(PathBuf),
}

impl InputSource {
    /// `@-` is stdin, `@path` a file, anything else literal text.
    pub fn from_arg(arg: &str) -> Self {
        match arg.strip_prefix('@') {
            Some("-") => InputSource::Stdin,
            Some(path) => InputSource::File(PathBuf::from(path)),
            None => InputSource::Text(arg.to_string()),
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            InputSource::Text(_) => "argument".to_string(),
            InputSource::Stdin => "stdin".to_string(),
            InputSource::File(path) => path.display().to_string(),
        }
    }

    pub fn is_stdin(&self) -> bool {
        matches!(self, InputSource::Stdin)
    }
}

pub enum FileReader {
    Stdin(BufReader<io::Stdin>),
    File(BufReader<File>),
    Text(Cursor<Vec<u8>>),
}

impl BufRead for FileReader {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        match self {
            FileReader::Stdin(reader) => reader.fill_buf(),
            FileReader::File(reader) => reader.fill_buf(),
            FileReader::Text(reader) => reader.fill_buf(),
        }
    }

    fn consume(&mut self, amt: usize) {
        match self {
            FileReader::Stdin(reader) => reader.consume(amt),
            FileReader::File(reader) => reader.consume(amt),
            FileReader::Text(reader) => reader.consume(amt),
        }
    }
}

impl io::Read for FileReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            FileReader::Stdin(reader) => reader.read(buf),
            FileReader::File(reader) => reader.read(buf),
            FileReader::Text(reader) => reader.read(buf),
        }
    }
}

pub fn create_file_reader(source: &InputSource) -> Result<FileReader, InputError> {
    match source {
        InputSource::Stdin => Ok(FileReader::Stdin(BufReader::new(io::stdin()))),
        InputSource::Text(text) => Ok(FileReader::Text(Cursor::new(text.as_bytes().to_vec()))),
        InputSource::File(path) => {
            let file = File::open(path).map_err(|source| InputError::Open {
                path: path.display().to_string(),
                source,
            })?;
            Ok(FileReader::File(BufReader::new(file)))
        }
    }
}

/// One non-blank, non-comment input line with its 1-based line number.
#[derive(Debug, Clone, PartialEq)]
pub struct InputLine {
    pub number: usize,
    pub text: String,
}

/// Streams lines lazily, skipping blank lines and `#` comments. The first
/// read error is yielded once and ends the stream.
pub struct LineIterator<R: BufRead> {
    lines: std::iter::Enumerate<io::Lines<R>>,
    source_name: String,
    finished: bool,
}

impl<R: BufRead> LineIterator<R> {
    pub fn new(reader: R, source_name: impl Into<String>) -> Self {
        Self {
            lines: reader.lines().enumerate(),
            source_name: source_name.into(),
            finished: false,
        }
    }
}

impl<R: BufRead> Iterator for LineIterator<R> {
    type Item = Result<InputLine, InputError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        for (idx, line_result) in self.lines.by_ref() {
            let number = idx + 1;
            let line = match line_result {
                Ok(line) => line,
                Err(source) => {
                    self.finished = true;
                    warn!(source = %self.source_name, line = number, "stopping at unreadable line");
                    return Some(Err(InputError::Read {
                        path: self.source_name.clone(),
                        line: number,
                        source,
                    }));
                }
            };

            let line = if number == 1 {
                line.trim_start_matches('\u{feff}')
            } else {
                line.as_str()
            };
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            return Some(Ok(InputLine {
                number,
                text: trimmed.to_string(),
            }));
        }

        self.finished = true;
        None
    }
}

pub type LineStream = Box<dyn Iterator<Item = Result<InputLine, InputError>>>;

pub fn open_lines(source: &InputSource) -> Result<LineStream, InputError> {
    let reader = create_file_reader(source)?;
    Ok(Box::new(LineIterator::new(reader, source.display_name())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines_of(data: &[u8]) -> Vec<Result<InputLine, InputError>> {
        LineIterator::new(Cursor::new(data.to_vec()), "test").collect()
    }

    #[test]
    fn test_skips_blank_and_comment_lines() {
        let data = "\u{feff}36°N to 37°N, 10°E to 11°E\n\n# heading\n   \nsecond line\r\n";
        let lines: Vec<InputLine> = lines_of(data.as_bytes())
            .into_iter()
            .map(Result::unwrap)
            .collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].number, 1);
        assert_eq!(lines[0].text, "36°N to 37°N, 10°E to 11°E");
        assert_eq!(lines[1].number, 5);
        assert_eq!(lines[1].text, "second line");
    }

    #[test]
    fn test_invalid_utf8_ends_stream_with_location() {
        let mut data = b"first\n".to_vec();
        data.extend_from_slice(&[0xff, 0xfe, b'\n']);
        data.extend_from_slice(b"third\n");

        let results = lines_of(&data);
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        let err = results[1].as_ref().unwrap_err();
        assert!(err.to_string().starts_with("test:2: failed to read line"));
    }

    #[test]
    fn test_input_source_from_arg() {
        assert_eq!(InputSource::from_arg("@-"), InputSource::Stdin);
        assert_eq!(
            InputSource::from_arg("@boxes.txt"),
            InputSource::File(PathBuf::from("boxes.txt"))
        );
        assert_eq!(
            InputSource::from_arg("36°N, 37°N"),
            InputSource::Text("36°N, 37°N".to_string())
        );
    }

    #[test]
    fn test_text_source_splits_lines() {
        let stream = open_lines(&InputSource::Text("a\nb".to_string())).unwrap();
        let texts: Vec<String> = stream.map(|line| line.unwrap().text).collect();
        assert_eq!(texts, vec!["a", "b"]);
    }

    #[test]
    fn test_missing_file_reports_path() {
        let result = open_lines(&InputSource::File(PathBuf::from("/no/such/boxes.txt")));
        let Err(err) = result else {
            panic!("expected open error");
        };
        assert!(err.to_string().starts_with("Cannot open /no/such/boxes.txt"));
    }
}
