use std::ops::Deref;

use serde::{Deserialize, Serialize};

/// Ordered tokens of a shell invokable command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandVector(Vec<String>);

impl CommandVector {
    pub fn new(tokens: Vec<String>) -> Self {
        Self(tokens)
    }

    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

impl Deref for CommandVector {
    type Target = [String];

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<String>> for CommandVector {
    fn from(tokens: Vec<String>) -> Self {
        Self(tokens)
    }
}

impl<'a> FromIterator<&'a str> for CommandVector {
    fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
        Self(iter.into_iter().map(str::to_owned).collect())
    }
}
