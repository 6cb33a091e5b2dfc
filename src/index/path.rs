/// Characters that are percent-encoded in each path component, with their escapes.
/// Anything outside this set passes through untouched.
const ENCODED: &[(char, &str)] = &[
    (' ', "%20"),
    ('&', "%26"),
    ('?', "%3F"),
    ('=', "%3D"),
    ('+', "%2B"),
];

/// Strip leading relative-path markers (`./`, `../`, `/`).
pub fn clean_path(path: &str) -> &str {
    path.trim_start_matches(['.', '/'])
}

/// Clean the path, then percent-encode the handled character set per component.
pub fn encode_path(path: &str) -> String {
    clean_path(path)
        .split('/')
        .map(encode_component)
        .collect::<Vec<_>>()
        .join("/")
}

fn encode_component(component: &str) -> String {
    let mut out = String::with_capacity(component.len());
    for ch in component.chars() {
        match ENCODED.iter().find(|(c, _)| *c == ch) {
            Some((_, escape)) => out.push_str(escape),
            None => out.push(ch),
        }
    }
    out
}

/// Reverse `encode_path` for the handled character set.
/// Other `%XX` sequences are left as they are.
pub fn decode_path(encoded: &str) -> String {
    let mut out = String::with_capacity(encoded.len());
    let mut rest = encoded;
    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        let hit = ENCODED.iter().find(|(_, escape)| {
            tail.get(..3)
                .map(|s| s.eq_ignore_ascii_case(escape))
                .unwrap_or(false)
        });
        match hit {
            Some((ch, _)) => {
                out.push(*ch);
                rest = &tail[3..];
            }
            None => {
                out.push('%');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
