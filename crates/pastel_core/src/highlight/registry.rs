//! Static lexer registry mapping tokens, extensions, and mimetypes.

/// One known syntax: display name, lookup aliases, file extensions, and the
/// mimetypes it declares. The first alias is the canonical token; the first
/// mimetype is the one recorded on created pastes.
#[derive(Debug)]
pub struct LexerEntry {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub extensions: &'static [&'static str],
    pub mimetypes: &'static [&'static str],
}

impl LexerEntry {
    /// Canonical token for this entry.
    pub fn token(&self) -> &'static str {
        self.aliases.first().copied().unwrap_or("text")
    }

    /// First declared mimetype, defaulting to `text/plain`.
    pub fn mimetype(&self) -> &'static str {
        self.mimetypes.first().copied().unwrap_or("text/plain")
    }

    fn matches_token(&self, token: &str) -> bool {
        self.name.eq_ignore_ascii_case(token)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(token))
            || self.mimetypes.iter().any(|m| m.eq_ignore_ascii_case(token))
    }
}

/// The fixed fallback entry. Kept first in the table.
const PLAIN_TEXT: usize = 0;

static ENTRIES: &[LexerEntry] = &[
    LexerEntry {
        name: "Plain Text",
        aliases: &["text", "txt", "plain", "plaintext"],
        extensions: &["txt", "text", "log"],
        mimetypes: &["text/plain"],
    },
    LexerEntry {
        name: "INI",
        aliases: &["ini", "cfg", "dosini"],
        extensions: &["ini", "cfg", "inf"],
        mimetypes: &["text/x-ini"],
    },
    LexerEntry {
        name: "Python",
        aliases: &["python", "py", "python3"],
        extensions: &["py", "pyw"],
        mimetypes: &["text/x-python", "application/x-python"],
    },
    LexerEntry {
        name: "Rust",
        aliases: &["rust", "rs"],
        extensions: &["rs"],
        mimetypes: &["text/rust", "text/x-rust"],
    },
    LexerEntry {
        name: "C",
        aliases: &["c"],
        extensions: &["c", "h"],
        mimetypes: &["text/x-csrc", "text/x-chdr"],
    },
    LexerEntry {
        name: "C++",
        aliases: &["cpp", "c++", "cxx"],
        extensions: &["cpp", "cc", "cxx", "hpp", "hh"],
        mimetypes: &["text/x-c++src", "text/x-c++hdr"],
    },
    LexerEntry {
        name: "C#",
        aliases: &["csharp", "cs"],
        extensions: &["cs"],
        mimetypes: &["text/x-csharp"],
    },
    LexerEntry {
        name: "Go",
        aliases: &["go", "golang"],
        extensions: &["go"],
        mimetypes: &["text/x-gosrc"],
    },
    LexerEntry {
        name: "Java",
        aliases: &["java"],
        extensions: &["java"],
        mimetypes: &["text/x-java"],
    },
    LexerEntry {
        name: "JavaScript",
        aliases: &["javascript", "js"],
        extensions: &["js", "mjs", "cjs"],
        mimetypes: &["application/javascript", "text/javascript"],
    },
    LexerEntry {
        name: "TypeScript",
        aliases: &["typescript", "ts"],
        extensions: &["ts", "tsx"],
        mimetypes: &["application/x-typescript", "text/x-typescript"],
    },
    LexerEntry {
        name: "JSON",
        aliases: &["json"],
        extensions: &["json"],
        mimetypes: &["application/json"],
    },
    LexerEntry {
        name: "YAML",
        aliases: &["yaml", "yml"],
        extensions: &["yaml", "yml"],
        mimetypes: &["text/x-yaml"],
    },
    LexerEntry {
        name: "TOML",
        aliases: &["toml"],
        extensions: &["toml"],
        mimetypes: &["application/toml", "text/x-toml"],
    },
    LexerEntry {
        name: "HTML",
        aliases: &["html", "htm"],
        extensions: &["html", "htm", "xhtml"],
        mimetypes: &["text/html"],
    },
    LexerEntry {
        name: "XML",
        aliases: &["xml"],
        extensions: &["xml", "xsd", "xsl", "svg"],
        mimetypes: &["text/xml", "application/xml"],
    },
    LexerEntry {
        name: "CSS",
        aliases: &["css"],
        extensions: &["css"],
        mimetypes: &["text/css"],
    },
    LexerEntry {
        name: "Bourne Again Shell (bash)",
        aliases: &["bash", "sh", "shell", "zsh"],
        extensions: &["sh", "bash", "zsh"],
        mimetypes: &["application/x-sh", "text/x-shellscript"],
    },
    LexerEntry {
        name: "SQL",
        aliases: &["sql"],
        extensions: &["sql"],
        mimetypes: &["text/x-sql"],
    },
    LexerEntry {
        name: "Markdown",
        aliases: &["markdown", "md"],
        extensions: &["md", "markdown"],
        mimetypes: &["text/x-markdown"],
    },
    LexerEntry {
        name: "Diff",
        aliases: &["diff", "udiff", "patch"],
        extensions: &["diff", "patch"],
        mimetypes: &["text/x-diff", "text/x-patch"],
    },
    LexerEntry {
        name: "LaTeX",
        aliases: &["latex", "tex"],
        extensions: &["tex", "sty"],
        mimetypes: &["text/x-latex"],
    },
];

/// The plain-text fallback entry.
pub fn plain_text() -> &'static LexerEntry {
    &ENTRIES[PLAIN_TEXT]
}

/// Look up an entry by name, alias, or mimetype (case-insensitive).
pub fn by_token(token: &str) -> Option<&'static LexerEntry> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    ENTRIES.iter().find(|entry| entry.matches_token(token))
}

/// Look up an entry by file extension.
pub fn for_extension(ext: &str) -> Option<&'static LexerEntry> {
    let ext = ext.trim();
    if ext.is_empty() {
        return None;
    }
    ENTRIES.iter().find(|entry| {
        entry
            .extensions
            .iter()
            .any(|known| known.eq_ignore_ascii_case(ext))
    })
}

/// Look up an entry from a filename's extension.
pub fn for_filename(filename: &str) -> Option<&'static LexerEntry> {
    let name = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() {
        return None;
    }
    for_extension(ext)
}
