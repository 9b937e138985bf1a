use std::collections::{HashMap, VecDeque};

use parking_lot::Mutex;
use sha2::{Digest, Sha256};

use crate::citations::render::RenderedMessage;
use crate::models::{Message, Source, ToolCall};

pub type Fingerprint = [u8; 32];

/// Bounded memo of rendered messages, keyed by a fingerprint of every input
/// that can change the output. Capacity 0 disables caching.
pub struct RenderCache {
    capacity: usize,
    state: Mutex<CacheState>,
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<Fingerprint, RenderedMessage>,
    order: VecDeque<Fingerprint>,
}

impl RenderCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            state: Mutex::new(CacheState::default()),
        }
    }

    pub fn fingerprint(
        message: &Message,
        tool_calls: &[ToolCall],
        conversation_sources: Option<&[Source]>,
    ) -> Fingerprint {
        let mut hasher = Sha256::new();
        write_field(&mut hasher, message.id.as_bytes());
        write_field(&mut hasher, format!("{:?}", message.message_type).as_bytes());
        write_field(&mut hasher, message.content.as_bytes());

        hasher.update((tool_calls.len() as u64).to_le_bytes());
        for call in tool_calls {
            write_field(&mut hasher, call.id.as_bytes());
            write_field(&mut hasher, call.name.as_bytes());
            write_field(&mut hasher, call.status.as_str().as_bytes());
            match &call.result {
                Some(result) => {
                    hasher.update([1u8]);
                    write_field(&mut hasher, result.as_bytes());
                }
                None => hasher.update([0u8]),
            }
        }

        match conversation_sources {
            Some(sources) => {
                hasher.update([1u8]);
                hasher.update((sources.len() as u64).to_le_bytes());
                for source in sources {
                    hasher.update(source.index.to_le_bytes());
                    write_field(&mut hasher, source.title.as_bytes());
                    write_field(&mut hasher, source.url.as_bytes());
                    write_field(&mut hasher, format!("{:?}", source.kind).as_bytes());
                }
            }
            None => hasher.update([0u8]),
        }

        hasher.finalize().into()
    }

    /// Returns the cached value for `key`, rendering and storing it on a miss.
    /// The flag is `true` on a hit.
    pub fn get_or_render<F>(&self, key: Fingerprint, render: F) -> (RenderedMessage, bool)
    where
        F: FnOnce() -> RenderedMessage,
    {
        if self.capacity == 0 {
            return (render(), false);
        }

        if let Some(hit) = self.state.lock().entries.get(&key) {
            return (hit.clone(), true);
        }

        // Render outside the lock; a concurrent miss on the same key just
        // stores an identical value.
        let rendered = render();

        let mut state = self.state.lock();
        if !state.entries.contains_key(&key) {
            while state.order.len() >= self.capacity {
                match state.order.pop_front() {
                    Some(oldest) => {
                        state.entries.remove(&oldest);
                    }
                    None => break,
                }
            }
            state.order.push_back(key);
            state.entries.insert(key, rendered.clone());
        }

        (rendered, false)
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }
}

fn write_field(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}
