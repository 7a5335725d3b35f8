/// Clitics split off the end of a word, longest first.
const CLITIC_SUFFIXES: &[&str] = &["n't", "'re", "'ve", "'ll", "'s", "'d", "'m"];

/// Lowercases `text` and splits it into Treebank-style word tokens.
///
/// Punctuation becomes its own token, `n't` and the other clitics are split
/// from their host word and `cannot` becomes `can` + `not`.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text
        .to_lowercase()
        .replace(['\u{2019}', '\u{2018}', '\u{02BC}'], "'");

    let mut tokens = Vec::new();
    for chunk in lowered.split_whitespace() {
        tokenize_chunk(chunk, &mut tokens);
    }
    tokens
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '\'' || c == '-' || c == '.'
}

fn tokenize_chunk(chunk: &str, out: &mut Vec<String>) {
    let mut word = String::new();
    for c in chunk.chars() {
        if is_word_char(c) {
            word.push(c);
        } else {
            flush_word(&mut word, out);
            out.push(c.to_string());
        }
    }
    flush_word(&mut word, out);
}

/// Peels edge punctuation off `word`, splits clitics and pushes the pieces.
fn flush_word(word: &mut String, out: &mut Vec<String>) {
    if word.is_empty() {
        return;
    }

    let raw = std::mem::take(word);
    let is_edge = |c: char| c == '\'' || c == '-' || c == '.';

    let core_start = raw.find(|c: char| !is_edge(c)).unwrap_or(raw.len());
    let core_end = raw
        .rfind(|c: char| !is_edge(c))
        .map(|idx| idx + raw[idx..].chars().next().map_or(1, char::len_utf8))
        .unwrap_or(core_start);

    for c in raw[..core_start].chars() {
        out.push(c.to_string());
    }

    let core = &raw[core_start..core_end];
    let trailing = &raw[core_end..];

    split_clitics(core, out);

    for c in trailing.chars() {
        out.push(c.to_string());
    }
}

fn split_clitics(core: &str, out: &mut Vec<String>) {
    if core.is_empty() {
        return;
    }

    if core == "cannot" {
        out.push("can".to_string());
        out.push("not".to_string());
        return;
    }

    for suffix in CLITIC_SUFFIXES {
        if let Some(host) = core.strip_suffix(suffix)
            && !host.is_empty()
            && !host.ends_with('\'')
        {
            out.push(host.to_string());
            out.push((*suffix).to_string());
            return;
        }
    }

    out.push(core.to_string());
}

/// Returns `true` if `token` contains no letters or digits.
pub fn is_punctuation(token: &str) -> bool {
    !token.chars().any(char::is_alphanumeric)
}
