//! Word-list collaborator for word mode.

use std::collections::BTreeSet;

pub trait Dictionary {
    fn is_valid_word(&self, word: &str) -> bool;
}

#[derive(Clone, Debug, Default)]
pub struct WordList {
    words: BTreeSet<String>,
}

const BUILTIN_WORDS: &str = "\
ab\nad\nah\nam\nan\nas\nat\naw\nax\nay\nbe\nby\ndo\neh\nem\nen\nex\ngo\nha\nhe\nhi\nho\nid\nif\nin\n\
is\nit\nla\nlo\nma\nme\nmu\nmy\nno\nnu\nof\noh\non\nor\now\nox\npa\npi\nre\nso\nta\nti\nto\nuh\num\n\
up\nus\nwe\nya\nye\nyo\nace\nate\nbat\nbee\ncat\ndog\ndue\near\neat\neel\negg\nend\nera\neve\nfan\n\
fin\nhat\nhen\nice\nink\nion\nlit\nman\nnet\nnot\noak\noat\nodd\nold\none\nore\nout\nowl\nown\n\
pea\npie\nrat\nsea\nsee\nset\nsit\nsun\ntea\nten\ntie\ntoe\nuse\nwet\nyes\nzoo\ntale\ntail\nsnake\n";

impl WordList {
    /// Parses one word per line; blank lines are skipped and case is folded.
    pub fn from_text(text: &str) -> Self {
        let words = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_ascii_lowercase)
            .collect();
        Self { words }
    }

    pub fn builtin() -> Self {
        Self::from_text(BUILTIN_WORDS)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Dictionary for WordList {
    fn is_valid_word(&self, word: &str) -> bool {
        self.words.contains(&word.to_ascii_lowercase())
    }
}

impl<D: Dictionary + ?Sized> Dictionary for &D {
    fn is_valid_word(&self, word: &str) -> bool {
        (**self).is_valid_word(word)
    }
}
