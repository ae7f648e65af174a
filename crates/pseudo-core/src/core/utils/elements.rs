use phf::{Map, phf_map};

const FILENAME_SEPARATORS: [char; 3] = ['.', '_', '-'];

/// Every element symbol of the periodic table, keyed by its lowercase form.
static ELEMENT_SYMBOLS: Map<&'static str, &'static str> = phf_map! {
    "h" => "H", "he" => "He", "li" => "Li", "be" => "Be", "b" => "B", "c" => "C",
    "n" => "N", "o" => "O", "f" => "F", "ne" => "Ne", "na" => "Na", "mg" => "Mg",
    "al" => "Al", "si" => "Si", "p" => "P", "s" => "S", "cl" => "Cl", "ar" => "Ar",
    "k" => "K", "ca" => "Ca", "sc" => "Sc", "ti" => "Ti", "v" => "V", "cr" => "Cr",
    "mn" => "Mn", "fe" => "Fe", "co" => "Co", "ni" => "Ni", "cu" => "Cu", "zn" => "Zn",
    "ga" => "Ga", "ge" => "Ge", "as" => "As", "se" => "Se", "br" => "Br", "kr" => "Kr",
    "rb" => "Rb", "sr" => "Sr", "y" => "Y", "zr" => "Zr", "nb" => "Nb", "mo" => "Mo",
    "tc" => "Tc", "ru" => "Ru", "rh" => "Rh", "pd" => "Pd", "ag" => "Ag", "cd" => "Cd",
    "in" => "In", "sn" => "Sn", "sb" => "Sb", "te" => "Te", "i" => "I", "xe" => "Xe",
    "cs" => "Cs", "ba" => "Ba", "la" => "La", "ce" => "Ce", "pr" => "Pr", "nd" => "Nd",
    "pm" => "Pm", "sm" => "Sm", "eu" => "Eu", "gd" => "Gd", "tb" => "Tb", "dy" => "Dy",
    "ho" => "Ho", "er" => "Er", "tm" => "Tm", "yb" => "Yb", "lu" => "Lu", "hf" => "Hf",
    "ta" => "Ta", "w" => "W", "re" => "Re", "os" => "Os", "ir" => "Ir", "pt" => "Pt",
    "au" => "Au", "hg" => "Hg", "tl" => "Tl", "pb" => "Pb", "bi" => "Bi", "po" => "Po",
    "at" => "At", "rn" => "Rn", "fr" => "Fr", "ra" => "Ra", "ac" => "Ac", "th" => "Th",
    "pa" => "Pa", "u" => "U", "np" => "Np", "pu" => "Pu", "am" => "Am", "cm" => "Cm",
    "bk" => "Bk", "cf" => "Cf", "es" => "Es", "fm" => "Fm", "md" => "Md", "no" => "No",
    "lr" => "Lr", "rf" => "Rf", "db" => "Db", "sg" => "Sg", "bh" => "Bh", "hs" => "Hs",
    "mt" => "Mt", "ds" => "Ds", "rg" => "Rg", "cn" => "Cn", "nh" => "Nh", "fl" => "Fl",
    "mc" => "Mc", "lv" => "Lv", "ts" => "Ts", "og" => "Og",
};

/// Looks up an element symbol regardless of capitalization.
///
/// # Return
///
/// Returns the canonical symbol (first letter uppercase, remainder lowercase)
/// or `None` if `symbol` is not an element.
pub fn canonical_element(symbol: &str) -> Option<&'static str> {
    let key = symbol.trim().to_ascii_lowercase();
    ELEMENT_SYMBOLS.get(key.as_str()).copied()
}

/// Derives the element symbol from a pseudopotential filename.
///
/// The filename must start with a one or two letter symbol, followed either by
/// the end of the name or by one of `.`, `_` or `-`. The symbol is matched
/// case-insensitively, so `ar.UPF` and `Ar_pbe.upf` both yield `Ar`, while
/// `Arr.upf` yields nothing.
pub fn element_from_filename(filename: &str) -> Option<&'static str> {
    let stem_end = filename.find(FILENAME_SEPARATORS).unwrap_or(filename.len());
    let symbol = &filename[..stem_end];

    if symbol.is_empty()
        || symbol.len() > 2
        || !symbol.chars().all(|c| c.is_ascii_alphabetic())
    {
        return None;
    }
    canonical_element(symbol)
}
