//! Derivation of short, unique abbreviations for metanode and metaedge kinds

use std::collections::BTreeMap;

/// Letter case of the derived abbreviations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Case {
    /// Metanodes, e.g. `G` for `gene`
    Upper,
    /// Metaedges, e.g. `a` for `association`
    Lower,
}

impl Case {
    fn apply(self, s: &str) -> String {
        match self {
            Case::Upper => s.to_uppercase(),
            Case::Lower => s.to_lowercase(),
        }
    }
}

/// Returns the shortest unique prefix of every name, in the order of `names`
///
/// Every name starts with its first character. As long as two names share
/// the same abbreviation, all colliding names are extended by one character.
/// Names that collide even at full length (e.g. `Gene` and `gene` in upper case)
/// are told apart by a numeric suffix, assigned in the order of `names`.
///
/// The result only depends on `names` and their order.
pub(crate) fn unique_prefixes(names: &[&str], case: Case) -> Vec<String> {
    let chars: Vec<Vec<char>> = names.iter().map(|name| name.chars().collect()).collect();
    let mut lengths = vec![1usize; names.len()];
    let mut suffixes = vec![0usize; names.len()];

    loop {
        let abbreviations: Vec<String> = chars
            .iter()
            .zip(&lengths)
            .zip(&suffixes)
            .map(|((name, &len), &suffix)| {
                let prefix: String = name[..len.min(name.len())].iter().collect();
                let prefix = case.apply(&prefix);
                if suffix == 0 {
                    prefix
                } else {
                    format!("{prefix}{suffix}")
                }
            })
            .collect();

        let mut groups: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        for (idx, abbreviation) in abbreviations.iter().enumerate() {
            groups.entry(abbreviation.as_str()).or_default().push(idx);
        }

        let mut collision = false;
        for members in groups.values().filter(|members| members.len() > 1) {
            collision = true;
            let extendable = members
                .iter()
                .any(|&idx| lengths[idx] < chars[idx].len());
            if extendable {
                for &idx in members {
                    if lengths[idx] < chars[idx].len() {
                        lengths[idx] += 1;
                    }
                }
            } else {
                for (rank, &idx) in members.iter().enumerate().skip(1) {
                    suffixes[idx] += rank + 1;
                }
            }
        }

        if !collision {
            return abbreviations;
        }
    }
}
