use std::sync::Arc;

use eyre::Result;
use radix_trie::{Trie, TrieCommon};

use super::Command;

/// Commands keyed by their lowercased names and aliases.
#[derive(Default)]
pub struct CommandRegistry {
    trie: Trie<String, Arc<Command>>,
}

impl CommandRegistry {
    /// Fails if the name or any alias is already taken in which case nothing
    /// is inserted.
    pub fn insert(&mut self, command: Arc<Command>) -> Result<()> {
        let names: Vec<_> = command.names().map(str::to_lowercase).collect();

        for (i, name) in names.iter().enumerate() {
            if name.is_empty() {
                bail!("command names must not be empty");
            }

            if self.trie.get(name).is_some() || names[..i].contains(name) {
                bail!("duplicate command name `{name}`");
            }
        }

        for name in names {
            self.trie.insert(name, Arc::clone(&command));
        }

        Ok(())
    }

    /// Remove the command with the given name or alias, including all its
    /// other names.
    pub fn remove(&mut self, name: &str) -> Option<Arc<Command>> {
        let command = self.get(name)?;

        for name in command.names() {
            self.trie.remove(&name.to_lowercase());
        }

        Some(command)
    }

    pub fn get(&self, name: &str) -> Option<Arc<Command>> {
        self.trie.get(&name.to_lowercase()).cloned()
    }

    /// Each command once, no matter how many aliases it has.
    pub fn commands(&self) -> Vec<Arc<Command>> {
        self.trie
            .iter()
            .filter(|(key, command)| **key == command.name.to_lowercase())
            .map(|(_, command)| Arc::clone(command))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.commands().len()
    }

    pub fn is_empty(&self) -> bool {
        self.trie.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use futures::FutureExt;

    use super::*;

    fn command(name: &str) -> Arc<Command> {
        Arc::new(Command::new(name, "", |_, _| async { Ok(()) }.boxed()).alias("p"))
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let mut registry = CommandRegistry::default();
        registry.insert(command("Ping")).unwrap();

        assert!(registry.get("ping").is_some());
        assert!(registry.get("PING").is_some());
        assert!(registry.get("P").is_some());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn duplicates_are_rejected() {
        let mut registry = CommandRegistry::default();
        registry.insert(command("ping")).unwrap();

        assert!(registry.insert(command("PING")).is_err());

        // alias `p` collides
        assert!(registry.insert(command("pong")).is_err());
        assert!(registry.get("pong").is_none());
    }

    #[test]
    fn remove_by_alias() {
        let mut registry = CommandRegistry::default();
        registry.insert(command("ping")).unwrap();

        let removed = registry.remove("p").unwrap();

        assert_eq!(removed.name, "ping");
        assert!(registry.is_empty());
    }
}
