//! Class names and CSS variable naming shared by the renderer and plugins.

use std::sync::LazyLock;

/// Class carried by every rendered line element.
pub const CODE_LINE_CLASS: &str = "ec-line";

/// Prefix of every generated CSS variable name.
pub const CSS_VAR_PREFIX: &str = "--ec-";

/// Long terms commonly found in style setting paths, with the short forms
/// used in generated variable names.
const DEFAULT_REPLACEMENTS: &[(&str, &str)] = &[
    ("background", "bg"),
    ("foreground", "fg"),
    ("color", "col"),
    ("border", "brd"),
    ("padding", "pad"),
    ("margin", "marg"),
    ("radius", "rad"),
    ("opacity", "opa"),
    ("width", "wd"),
    ("height", "ht"),
    ("weight", "wg"),
    ("block", "blk"),
    ("inline", "inl"),
    ("bottom", "btm"),
    ("value", "val"),
    ("active", "act"),
    ("inactive", "inact"),
    ("highlight", "hl"),
    ("selection", "sel"),
    ("indicator", "ind"),
    ("shadow", "shd"),
    ("family", "fml"),
    ("transform", "trf"),
    ("decoration", "dec"),
    ("button", "btn"),
    ("editor", "ed"),
    ("terminal", "trm"),
    ("scrollbar", "sb"),
    ("toolbar", "tb"),
    ("titlebar", "ttb"),
    ("textMarkers", "tm"),
    ("frames", "frm"),
];

static DEFAULT_NAMES: LazyLock<CssVarNames> = LazyLock::new(CssVarNames::default);

/// Generates CSS variable names for style setting paths such as
/// `frames.editorActiveTabBackground`.
///
/// Terms are applied in insertion order. Plugins that introduce their own long
/// terms can extend the table with [`CssVarNames::with_replacement`].
#[derive(Debug, Clone)]
pub struct CssVarNames {
    replacements: Vec<(String, String)>,
}

impl Default for CssVarNames {
    fn default() -> Self {
        Self {
            replacements: DEFAULT_REPLACEMENTS
                .iter()
                .map(|(term, short)| (term.to_string(), short.to_string()))
                .collect(),
        }
    }
}

impl CssVarNames {
    /// Adds a replacement, or updates the short form of a known term.
    pub fn with_replacement(mut self, term: impl Into<String>, short: impl Into<String>) -> Self {
        let term = term.into();
        let short = short.into();
        match self.replacements.iter_mut().find(|(t, _)| *t == term) {
            Some(existing) => existing.1 = short,
            None => self.replacements.push((term, short)),
        }
        self
    }

    /// Returns the variable name for a setting path.
    ///
    /// Dots become dashes, known terms are shortened and the result is
    /// prefixed with `--ec-` to avoid collisions.
    pub fn name(&self, setting_path: &str) -> String {
        let mut var_name = setting_path.replace('.', "-");
        for (term, short) in &self.replacements {
            var_name = replace_term(&var_name, term, short);
        }
        format!("{CSS_VAR_PREFIX}{var_name}")
    }
}

/// Shorthand for [`CssVarNames::name`] with the default replacement table.
pub fn css_var_name(setting_path: &str) -> String {
    DEFAULT_NAMES.name(setting_path)
}

/// Replaces whole-word occurrences of `term` in a camelCase/dashed string.
///
/// The lowercase term matches when it is not glued to lowercase letters on
/// either side. The capitalized term matches after a lowercase letter (or at
/// the start) and before a non-lowercase character (or the end).
fn replace_term(input: &str, term: &str, short: &str) -> String {
    if term.is_empty() {
        return input.to_string();
    }
    let capitalized_term = capitalize(term);
    let capitalized_short = capitalize(short);
    let bytes = input.as_bytes();
    let is_lower_at = |i: usize| bytes[i].is_ascii_lowercase();
    let ends_on_boundary = |end: usize| end == bytes.len() || !is_lower_at(end);

    let mut out = String::with_capacity(input.len());
    let mut i = 0;
    while i < input.len() {
        let rest = &input[i..];
        if rest.starts_with(term) && (i == 0 || !is_lower_at(i - 1)) && ends_on_boundary(i + term.len())
        {
            out.push_str(short);
            i += term.len();
            continue;
        }
        if rest.starts_with(capitalized_term.as_str())
            && (i == 0 || is_lower_at(i - 1))
            && ends_on_boundary(i + capitalized_term.len())
        {
            out.push_str(&capitalized_short);
            i += capitalized_term.len();
            continue;
        }
        let ch_len = rest.chars().next().map_or(1, char::len_utf8);
        out.push_str(&rest[..ch_len]);
        i += ch_len;
    }
    out
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
