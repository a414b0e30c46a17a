//! Y. Hatanaka lossless TextDiff algorithm

/// [TextDiff] recovers text compressed with the differential algorithm
/// designed by Y. Hatanaka: a space keeps the previous character,
/// '&' stands for a space, anything else replaces.
#[derive(Debug, Default, Clone)]
pub struct TextDiff {
    buffer: Vec<char>,
    recovered: String,
}

impl TextDiff {
    /// Creates a new [TextDiff] initialized with given content
    pub fn new(data: &str) -> Self {
        let mut s = Self::default();
        s.force_init(data);
        s
    }

    /// Force kernel reset using new content
    pub fn force_init(&mut self, data: &str) {
        self.buffer = data.chars().collect();
        self.recovered = data.to_string();
    }

    /// Decompresses given data. Returns recovered value.
    /// Shorter data preserve the previous tail.
    pub fn decompress(&mut self, data: &str) -> &str {
        for (i, raw) in data.chars().enumerate() {
            let c = if raw == '&' { ' ' } else { raw };
            match self.buffer.get_mut(i) {
                Some(buf) => {
                    if raw != ' ' {
                        *buf = c;
                    }
                },
                None => self.buffer.push(c),
            }
        }
        self.recovered = self.buffer.iter().collect();
        &self.recovered
    }

    /// Last recovered value
    pub fn as_str(&self) -> &str {
        &self.recovered
    }
}
