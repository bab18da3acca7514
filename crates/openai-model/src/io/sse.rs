use super::{Chunks, ChunksError};

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    ChunksError(ChunksError),
    InvalidPayload,
}

/// A type for reading the `data` payloads of server-sent events from a
/// chunk stream.
pub struct Sse {
    buf: Vec<u8>,
    chunks: Chunks,
    exhausted: bool,
}

impl Sse {
    #[inline]
    pub fn new(chunks: Chunks) -> Self {
        Self {
            buf: Vec::new(),
            chunks,
            exhausted: false,
        }
    }

    /// Returns the payload of the next event that carries data.
    ///
    /// Events without a `data` field (comments, keep-alives) are skipped.
    /// A trailing event that is not terminated by a blank line is dropped.
    pub async fn next_event(&mut self) -> Result<Option<String>, Error> {
        loop {
            // Drain complete events from the buffer before reading more, so
            // one chunk holding several events yields all of them.
            while let Some(block) = self.take_block() {
                if let Some(data) = parse_block(&block)? {
                    return Ok(Some(data));
                }
            }

            if self.exhausted {
                return Ok(None);
            }
            match self.chunks.next_chunk().await.map_err(Error::ChunksError)? {
                Some(bytes) => self.buf.extend_from_slice(&bytes),
                None => self.exhausted = true,
            }
        }
    }

    fn take_block(&mut self) -> Option<Vec<u8>> {
        // event         = *( comment / field ) end-of-line
        // field         = 1*name-char [ colon [ space ] *any-char ] end-of-line
        //
        // An event ends at an empty line. Lines end with LF or CRLF, a lone
        // CR is not handled.
        let (eol_idx, next_idx) =
            self.buf.iter().enumerate().find_map(|(idx, &byte)| {
                if byte != b'\n' {
                    return None;
                }
                let rest = &self.buf[idx + 1..];
                if rest.starts_with(b"\n") {
                    Some((idx, idx + 2))
                } else if rest.starts_with(b"\r\n") {
                    Some((idx, idx + 3))
                } else {
                    None
                }
            })?;
        // Keep the last line feed so a trailing CR is stripped with it.
        let block = self.buf[..=eol_idx].to_vec();
        self.buf.drain(..next_idx);
        Some(block)
    }
}

fn parse_block(block: &[u8]) -> Result<Option<String>, Error> {
    let Ok(block) = str::from_utf8(block) else {
        return Err(Error::InvalidPayload);
    };

    let mut data: Option<String> = None;
    for line in block.lines() {
        if line.is_empty() || line.starts_with(':') {
            continue;
        }
        let Some((name, value)) = line.split_once(':') else {
            // A field without a value. Only `data` is meaningful to us and
            // a bare `data` carries nothing.
            if line == "data" {
                data.get_or_insert_default();
                continue;
            }
            return Err(Error::InvalidPayload);
        };
        if name != "data" {
            // `event`, `id` and `retry` are not used by the completions API.
            continue;
        }
        let value = value.strip_prefix(' ').unwrap_or(value);
        match &mut data {
            Some(data) => {
                data.push('\n');
                data.push_str(value);
            }
            None => data = Some(value.to_owned()),
        }
    }
    Ok(data)
}
