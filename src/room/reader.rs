use tokio::sync::mpsc;
use uuid::Uuid;

/// Identity of the participant that opened a stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantInfo {
    pub identity: String,
}

impl ParticipantInfo {
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TextStreamInfo {
    pub id: Uuid,
    pub topic: String,
}

/// Read side of one inbound text stream.
#[derive(Debug)]
pub struct TextStreamReader {
    info: TextStreamInfo,
    chunks: mpsc::UnboundedReceiver<String>,
}

/// Write side of a text stream; dropping or closing it ends the stream.
#[derive(Debug)]
pub struct TextStreamWriter {
    chunks: mpsc::UnboundedSender<String>,
}

impl TextStreamReader {
    /// Opens a new stream on `topic`, returning both ends.
    pub fn channel(topic: impl Into<String>) -> (TextStreamWriter, TextStreamReader) {
        let (chunks_tx, chunks_rx) = mpsc::unbounded_channel();
        let reader = TextStreamReader {
            info: TextStreamInfo {
                id: Uuid::new_v4(),
                topic: topic.into(),
            },
            chunks: chunks_rx,
        };
        (TextStreamWriter { chunks: chunks_tx }, reader)
    }

    /// A stream that already holds its complete text.
    pub fn from_text(topic: impl Into<String>, text: impl Into<String>) -> Self {
        let (writer, reader) = Self::channel(topic);
        writer.write(text);
        reader
    }

    pub fn info(&self) -> &TextStreamInfo {
        &self.info
    }

    /// Waits for the writer to finish and returns everything it wrote.
    pub async fn read_all(mut self) -> String {
        let mut text = String::new();
        while let Some(chunk) = self.chunks.recv().await {
            text.push_str(&chunk);
        }
        text
    }
}

impl TextStreamWriter {
    /// Appends a chunk. Returns `false` once the reader is gone.
    pub fn write(&self, chunk: impl Into<String>) -> bool {
        self.chunks.send(chunk.into()).is_ok()
    }

    pub fn close(self) {}
}
