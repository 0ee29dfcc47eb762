use super::error::LoadError;
use super::matching::{match_top_n, unit};
use super::text::normalize;
use super::{EmbeddingStore, Neighbor};
use byteorder::{ByteOrder, LittleEndian};
use std::collections::HashMap;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;

const MAX_DIM: usize = 1 << 16;
const PREALLOC_ROWS: usize = 1 << 16;

/// Read-only word -> vector table, loaded once at startup.
pub struct KeyedVectors {
    words: Vec<String>,
    index: HashMap<String, usize>,
    vectors: Vec<Vec<f32>>,
    units: Vec<Vec<f32>>,
    dim: usize,
}

impl KeyedVectors {
    /// Builds a table from `(word, vector)` pairs. Keys are normalized; a key
    /// that collides with an earlier one after normalization is dropped.
    pub fn from_entries<I>(entries: I) -> Result<Self, LoadError>
    where
        I: IntoIterator<Item = (String, Vec<f32>)>,
    {
        let mut words = Vec::new();
        let mut index = HashMap::new();
        let mut vectors = Vec::new();
        let mut dim = None;

        for (row, (word, vector)) in entries.into_iter().enumerate() {
            let expected = *dim.get_or_insert(vector.len());
            if vector.len() != expected {
                return Err(LoadError::DimensionMismatch {
                    row,
                    expected,
                    actual: vector.len(),
                });
            }
            let key = normalize(&word);
            if index.contains_key(&key) {
                warn!("duplicate key after normalization at row {}: {}", row, key);
                continue;
            }
            index.insert(key.clone(), words.len());
            words.push(key);
            vectors.push(vector);
        }

        let dim = match dim {
            Some(dim) if dim > 0 && !words.is_empty() => dim,
            _ => return Err(LoadError::Empty),
        };
        let units = vectors.iter().map(|v| unit(v)).collect();

        Ok(Self {
            words,
            index,
            vectors,
            units,
            dim,
        })
    }

    /// Loads a word2vec table: `.bin` files use the binary layout, anything
    /// else is read as whitespace-separated text.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        if !path.exists() {
            return Err(LoadError::NotFound(path.to_path_buf()));
        }
        let file = fs::File::open(path)?;
        let reader = BufReader::new(file);
        let is_binary = path.extension().map_or(false, |ext| ext == "bin");
        let entries = if is_binary {
            read_binary(reader)?
        } else {
            read_text(reader)?
        };
        Self::from_entries(entries)
    }

    pub fn dim(&self) -> usize {
        self.dim
    }
}

impl EmbeddingStore for KeyedVectors {
    fn len(&self) -> usize {
        self.words.len()
    }

    fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    fn vector(&self, word: &str) -> Option<&[f32]> {
        self.index.get(word).map(|&i| self.vectors[i].as_slice())
    }

    fn most_similar(&self, word: &str, topn: usize) -> Vec<Neighbor> {
        let Some(&row) = self.index.get(word) else {
            return Vec::new();
        };
        match_top_n(&self.units, &self.units[row], topn, Some(row))
            .into_iter()
            .map(|m| Neighbor {
                word: self.words[m.index].clone(),
                score: m.similarity,
            })
            .collect()
    }
}

fn parse_header(line: &str) -> Result<(usize, usize), LoadError> {
    let mut parts = line.split_whitespace();
    let (Some(count), Some(dim), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(LoadError::BadHeader(line.to_string()));
    };
    let count = count
        .parse::<usize>()
        .map_err(|_| LoadError::BadHeader(line.to_string()))?;
    let dim = dim
        .parse::<usize>()
        .map_err(|_| LoadError::BadHeader(line.to_string()))?;
    Ok((count, dim))
}

fn parse_row(row: usize, line: &str) -> Result<(String, Vec<f32>), LoadError> {
    let mut parts = line.split_whitespace();
    let word = parts.next().ok_or_else(|| LoadError::BadRow {
        row,
        reason: "missing word".to_string(),
    })?;
    let vector = parts
        .map(|v| v.parse::<f32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| LoadError::BadRow {
            row,
            reason: e.to_string(),
        })?;
    Ok((word.to_string(), vector))
}

/// Text layout: optional `<count> <dim>` header, then `word v1 .. vD` per line.
fn read_text(reader: impl BufRead) -> Result<Vec<(String, Vec<f32>)>, LoadError> {
    let mut header = None;
    let mut entries = Vec::new();

    for (row, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        if row == 0 {
            if let Ok(parsed) = parse_header(&line) {
                header = Some(parsed);
                continue;
            }
        }
        let (word, vector) = parse_row(row, &line)?;
        if let Some((_, dim)) = header {
            if vector.len() != dim {
                return Err(LoadError::DimensionMismatch {
                    row,
                    expected: dim,
                    actual: vector.len(),
                });
            }
        }
        entries.push((word, vector));
    }

    if let Some((count, _)) = header {
        if count != entries.len() {
            return Err(LoadError::CountMismatch {
                expected: count,
                actual: entries.len(),
            });
        }
    }
    Ok(entries)
}

/// Binary layout: `<count> <dim>\n` header, then per entry the word, a space,
/// and `dim` little-endian f32 values, optionally followed by a newline.
fn read_binary(mut reader: impl BufRead) -> Result<Vec<(String, Vec<f32>)>, LoadError> {
    let mut line = String::new();
    reader.read_line(&mut line)?;
    let (count, dim) = parse_header(line.trim())?;
    let row_bytes = dim
        .checked_mul(4)
        .filter(|_| dim <= MAX_DIM)
        .ok_or_else(|| LoadError::BadHeader(line.trim().to_string()))?;

    // the header is untrusted, the table grows as rows actually arrive
    let mut entries = Vec::with_capacity(count.min(PREALLOC_ROWS));
    let mut word_bytes = Vec::new();
    let mut byte_vec = vec![0u8; row_bytes];
    for row in 0..count {
        word_bytes.clear();
        reader.read_until(b' ', &mut word_bytes)?;
        if word_bytes.last() != Some(&b' ') {
            return Err(LoadError::CountMismatch {
                expected: count,
                actual: row,
            });
        }
        word_bytes.pop();
        // the previous entry's trailing newline, when present
        let word_start = word_bytes
            .iter()
            .position(|b| *b != b'\n')
            .unwrap_or(word_bytes.len());
        let word = String::from_utf8(word_bytes[word_start..].to_vec()).map_err(|e| {
            LoadError::BadRow {
                row,
                reason: e.to_string(),
            }
        })?;

        reader.read_exact(&mut byte_vec)?;
        entries.push((word, bytes_to_float(&byte_vec)));
    }

    Ok(entries)
}

fn bytes_to_float(byte_vec: &[u8]) -> Vec<f32> {
    let mut float_vec = vec![0f32; byte_vec.len() / 4];
    LittleEndian::read_f32_into(byte_vec, &mut float_vec);
    float_vec
}

#[cfg(test)]
pub(crate) fn float_to_bytes(float_vec: &[f32]) -> Vec<u8> {
    let mut byte_vec = vec![0u8; float_vec.len() * 4];
    LittleEndian::write_f32_into(float_vec, &mut byte_vec);
    byte_vec
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn write_fixture(suffix: &str, bytes: &[u8]) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(bytes).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn loads_text_with_header() {
        let file = write_fixture(
            ".vec",
            "3 2\nநாய் 1.0 0.0\nபூனை 0.8 0.2\nமரம் 0.0 1.0\n".as_bytes(),
        );
        let kv = KeyedVectors::load(file.path()).unwrap();
        assert_eq!(kv.len(), 3);
        assert_eq!(kv.dim(), 2);
        assert_eq!(kv.vector("பூனை"), Some(&[0.8f32, 0.2][..]));
    }

    #[test]
    fn loads_text_without_header() {
        let file = write_fixture(".txt", b"one 1 0 0\ntwo 0 1 0\n");
        let kv = KeyedVectors::load(file.path()).unwrap();
        assert_eq!(kv.len(), 2);
        assert_eq!(kv.dim(), 3);
    }

    #[test]
    fn loads_binary() {
        let mut bytes = b"2 3\n".to_vec();
        for (word, vector) in [("அ", [1.0f32, 2.0, 3.0]), ("ஆ", [-1.0, 0.5, 0.25])] {
            bytes.extend_from_slice(word.as_bytes());
            bytes.push(b' ');
            bytes.extend_from_slice(&float_to_bytes(&vector));
            bytes.push(b'\n');
        }
        let file = write_fixture(".bin", &bytes);
        let kv = KeyedVectors::load(file.path()).unwrap();
        assert_eq!(kv.len(), 2);
        assert_eq!(kv.vector("ஆ"), Some(&[-1.0f32, 0.5, 0.25][..]));
    }

    fn binary_row(word: &[u8], vector: &[f32]) -> Vec<u8> {
        let mut bytes = word.to_vec();
        bytes.push(b' ');
        bytes.extend_from_slice(&float_to_bytes(vector));
        bytes.push(b'\n');
        bytes
    }

    #[test]
    fn binary_truncated_vector_is_io_error() {
        let mut bytes = b"1 3\n".to_vec();
        bytes.extend_from_slice(b"a ");
        bytes.extend_from_slice(&float_to_bytes(&[1.0]));
        let file = write_fixture(".bin", &bytes);
        match KeyedVectors::load(file.path()) {
            Err(LoadError::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::UnexpectedEof),
            other => panic!("expected io error, got {:?}", other.err()),
        }
    }

    #[test]
    fn binary_header_count_above_rows() {
        let mut bytes = b"3 2\n".to_vec();
        bytes.extend(binary_row(b"a", &[1.0, 0.0]));
        bytes.extend(binary_row(b"b", &[0.0, 1.0]));
        let file = write_fixture(".bin", &bytes);
        assert!(matches!(
            KeyedVectors::load(file.path()),
            Err(LoadError::CountMismatch { expected: 3, actual: 2 })
        ));
    }

    #[test]
    fn binary_word_must_be_utf8() {
        let mut bytes = b"2 2\n".to_vec();
        bytes.extend(binary_row(b"ok", &[1.0, 0.0]));
        bytes.extend(binary_row(&[0xff, 0xfe, b'x'], &[0.0, 1.0]));
        let file = write_fixture(".bin", &bytes);
        assert!(matches!(
            KeyedVectors::load(file.path()),
            Err(LoadError::BadRow { row: 1, .. })
        ));
    }

    #[test]
    fn binary_oversized_header_is_rejected() {
        let mut bytes = b"99999999999 300\n".to_vec();
        bytes.extend(binary_row(b"a", &[0.5; 300]));
        let file = write_fixture(".bin", &bytes);
        assert!(matches!(
            KeyedVectors::load(file.path()),
            Err(LoadError::CountMismatch { actual: 1, .. })
        ));

        let huge_dim = format!("1 {}\n", usize::MAX);
        let file = write_fixture(".bin", huge_dim.as_bytes());
        assert!(matches!(
            KeyedVectors::load(file.path()),
            Err(LoadError::BadHeader(_))
        ));
    }

    #[test]
    fn missing_file_is_reported() {
        let err = KeyedVectors::load(Path::new("model/does-not-exist.bin"))
            .err()
            .unwrap();
        assert!(matches!(err, LoadError::NotFound(_)));
        assert!(err.to_string().starts_with("Model file not found"));
    }

    #[test]
    fn rejects_ragged_rows_and_bad_counts() {
        let ragged = write_fixture(".txt", b"a 1 0\nb 1\n");
        assert!(matches!(
            KeyedVectors::load(ragged.path()),
            Err(LoadError::DimensionMismatch { .. })
        ));

        let short = write_fixture(".vec", b"3 2\na 1 0\nb 0 1\n");
        assert!(matches!(
            KeyedVectors::load(short.path()),
            Err(LoadError::CountMismatch { expected: 3, actual: 2 })
        ));

        let garbage = write_fixture(".txt", b"a 1 x\n");
        assert!(matches!(
            KeyedVectors::load(garbage.path()),
            Err(LoadError::BadRow { .. })
        ));

        let empty = write_fixture(".txt", b"");
        assert!(matches!(KeyedVectors::load(empty.path()), Err(LoadError::Empty)));
    }

    #[test]
    fn keys_are_normalized_on_load() {
        let kv = KeyedVectors::from_entries(vec![
            ("\u{0B95}\u{0BC6}\u{0BBE}".to_string(), vec![1.0, 0.0]),
            ("\u{0B95}\u{0BCA}".to_string(), vec![0.0, 1.0]),
        ])
        .unwrap();
        assert_eq!(kv.len(), 1);
        assert!(kv.contains("\u{0B95}\u{0BCA}"));
        assert_eq!(kv.vector("\u{0B95}\u{0BCA}"), Some(&[1.0f32, 0.0][..]));
    }

    #[test]
    fn most_similar_excludes_query() {
        let kv = KeyedVectors::from_entries(vec![
            ("a".to_string(), vec![1.0, 0.0]),
            ("b".to_string(), vec![0.9, 0.1]),
            ("c".to_string(), vec![0.0, 1.0]),
        ])
        .unwrap();
        let neighbors = kv.most_similar("a", 5);
        let words: Vec<&str> = neighbors.iter().map(|n| n.word.as_str()).collect();
        assert_eq!(words, vec!["b", "c"]);
        assert!(neighbors[0].score > 0.99);
        assert!(kv.most_similar("zzz", 5).is_empty());
    }
}
