//! 文本分块器
//!
//! 把超过 provider 单次请求长度上限的文本切成若干块，
//! 优先在句末标点处切分，其次逗号类标点，再次空白，最后按字符硬切

/// Google Translate TTS 的单次请求上限（字符）
pub const DEFAULT_MAX_CHARS: usize = 200;

/// 分块配置
#[derive(Debug, Clone)]
pub struct ChunkConfig {
    /// 每块最大字符数
    pub max_chars: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            max_chars: DEFAULT_MAX_CHARS,
        }
    }
}

/// 强分隔符（句末标点）
#[inline]
fn is_strong_delimiter(ch: char) -> bool {
    matches!(ch, '.' | '?' | '!' | '。' | '？' | '！')
}

/// 弱分隔符（逗号等）
#[inline]
fn is_weak_delimiter(ch: char) -> bool {
    matches!(ch, ',' | ';' | ':' | '，' | '；' | '：')
}

#[inline]
fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// 按标点切成片段（标点保留在片段末尾）
fn split_by_delimiters(text: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();

    for ch in text.chars() {
        current.push(ch);
        if is_strong_delimiter(ch) || is_weak_delimiter(ch) {
            let trimmed = current.trim();
            if !trimmed.is_empty() {
                segments.push(trimmed.to_string());
            }
            current.clear();
        }
    }

    let trimmed = current.trim();
    if !trimmed.is_empty() {
        segments.push(trimmed.to_string());
    }

    segments
}

/// 把超长片段按空白拆开，单词仍超长时按字符硬切
fn split_oversized(segment: &str, max_chars: usize) -> Vec<String> {
    if char_len(segment) <= max_chars {
        return vec![segment.to_string()];
    }

    let mut pieces = Vec::new();
    for word in segment.split_whitespace() {
        if char_len(word) <= max_chars {
            pieces.push(word.to_string());
            continue;
        }
        let chars: Vec<char> = word.chars().collect();
        for window in chars.chunks(max_chars) {
            pieces.push(window.iter().collect());
        }
    }
    pieces
}

/// 贪心合并：相邻片段以空格连接，直到再加一段就会超限
fn merge_up_to(pieces: Vec<String>, max_chars: usize) -> Vec<String> {
    let mut chunks: Vec<String> = Vec::new();
    let mut buffer = String::new();

    for piece in pieces {
        if buffer.is_empty() {
            buffer = piece;
        } else if char_len(&buffer) + 1 + char_len(&piece) <= max_chars {
            buffer.push(' ');
            buffer.push_str(&piece);
        } else {
            chunks.push(std::mem::replace(&mut buffer, piece));
        }
    }

    if !buffer.is_empty() {
        chunks.push(buffer);
    }

    chunks
}

/// 对文本分块
///
/// 保证每块非空且不超过 `max_chars` 个字符；文本不超限时原样返回一块（裁掉两端空白）
pub fn chunk_text(text: &str, config: &ChunkConfig) -> Vec<String> {
    let max_chars = config.max_chars.max(1);
    let text = text.trim();

    if text.is_empty() {
        return Vec::new();
    }
    if char_len(text) <= max_chars {
        return vec![text.to_string()];
    }

    let pieces = split_by_delimiters(text)
        .iter()
        .flat_map(|segment| split_oversized(segment, max_chars))
        .collect();

    merge_up_to(pieces, max_chars)
}
