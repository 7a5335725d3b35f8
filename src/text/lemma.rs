use std::collections::HashMap;
use std::sync::LazyLock;

/// Irregular plurals mapped to their dictionary form.
const IRREGULAR_PLURALS: &[(&str, &str)] = &[
    ("children", "child"),
    ("men", "man"),
    ("women", "woman"),
    ("people", "person"),
    ("mice", "mouse"),
    ("lice", "louse"),
    ("geese", "goose"),
    ("teeth", "tooth"),
    ("feet", "foot"),
    ("oxen", "ox"),
    ("dice", "die"),
    ("leaves", "leaf"),
    ("lives", "life"),
    ("knives", "knife"),
    ("wives", "wife"),
    ("halves", "half"),
    ("shelves", "shelf"),
    ("wolves", "wolf"),
    ("indices", "index"),
    ("matrices", "matrix"),
    ("vertices", "vertex"),
    ("appendices", "appendix"),
    ("analyses", "analysis"),
    ("hypotheses", "hypothesis"),
    ("theses", "thesis"),
    ("crises", "crisis"),
    ("axes", "axis"),
    ("bases", "basis"),
    ("diagnoses", "diagnosis"),
    ("phenomena", "phenomenon"),
    ("criteria", "criterion"),
    ("bacteria", "bacterium"),
    ("mitochondria", "mitochondrion"),
    ("nuclei", "nucleus"),
    ("fungi", "fungus"),
    ("stimuli", "stimulus"),
    ("radii", "radius"),
    ("alumni", "alumnus"),
    ("formulae", "formula"),
    ("algae", "alga"),
    ("larvae", "larva"),
    ("antennae", "antenna"),
    ("seamen", "seaman"),
    ("cameramen", "cameraman"),
];

/// Nouns whose singular ends in `ie`, so `-ies` must not become `-y`.
const IE_SINGULARS: &[&str] = &[
    "movie", "cookie", "calorie", "zombie", "rookie", "prairie", "brownie", "selfie", "hippie",
    "genie", "smoothie", "budgie", "collie", "goalie", "magpie", "necktie", "pixie", "sortie",
    "auntie", "boogie", "birdie", "coterie", "menagerie", "reverie", "lingerie", "organdie",
];

/// Words ending in `s`/`men` that are already in base form.
const INVARIANT: &[&str] = &[
    "always", "perhaps", "whereas", "thus", "sometimes", "towards", "afterwards", "besides",
    "nevertheless", "series", "species", "news", "physics", "mathematics", "economics",
    "genetics", "ethics", "politics", "statistics", "lens", "bias", "atlas", "canvas", "chaos",
    "cosmos", "ethos", "pathos", "yes", "abdomen", "specimen", "stamen", "regimen", "omen",
    "amen", "hymen", "semen", "acumen", "gas", "plus", "minus", "various", "previous", "famous",
    "numerous", "obvious", "serious", "continuous", "analogous", "lumen", "foramen", "ramen",
    "germen", "tegmen", "carmen", "dolmen", "albumen", "bitumen", "cyclamen", "rumen",
];

static IRREGULAR_MAP: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| IRREGULAR_PLURALS.iter().copied().collect());

/// Reduces a lowercased token to its dictionary base form.
///
/// Noun morphology only: irregular plurals come from a fixed table, regular
/// plurals are handled by suffix rules. Tokens that are not purely
/// alphabetic pass through unchanged.
pub fn lemmatize(token: &str) -> String {
    if let Some(base) = IRREGULAR_MAP.get(token) {
        return (*base).to_string();
    }

    if token.len() <= 3 || !token.chars().all(char::is_alphabetic) || INVARIANT.contains(&token) {
        return token.to_string();
    }

    if let Some(stem) = token.strip_suffix("ies")
        && stem.len() > 1
    {
        let singular = &token[..token.len() - 1];
        if IE_SINGULARS.contains(&singular) {
            return singular.to_string();
        }
        return format!("{stem}y");
    }

    for suffix in ["sses", "ches", "shes", "xes", "zes"] {
        if token.ends_with(suffix) {
            return token[..token.len() - 2].to_string();
        }
    }

    // Compounds of "man" (firemen, chairmen); a vowel before "men" is
    // usually a Latin singular (lumen, foramen).
    if let Some(stem) = token.strip_suffix("men")
        && stem.len() >= 3
        && stem.ends_with(|c: char| c == 'e' || !"aiouy".contains(c))
    {
        return format!("{stem}man");
    }

    if token.ends_with('s')
        && !token.ends_with("ss")
        && !token.ends_with("us")
        && !token.ends_with("is")
    {
        return token[..token.len() - 1].to_string();
    }

    token.to_string()
}
