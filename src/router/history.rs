/// Browser-style session history of location strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
  entries: Vec<String>,
  cursor: usize,
}

impl History {
  pub fn new(initial: impl Into<String>) -> Self {
    Self {
      entries: vec![initial.into()],
      cursor: 0,
    }
  }

  /// History for a deep link: home first, so going back leaves the deep link.
  pub fn deep_link(location: impl Into<String>) -> Self {
    let mut history = Self::new("/");
    history.push(location);
    history
  }

  pub fn current(&self) -> &str {
    &self.entries[self.cursor]
  }

  /// Append an entry, discarding anything forward of the cursor.
  /// Pushing the current location again does nothing.
  pub fn push(&mut self, location: impl Into<String>) {
    let location = location.into();
    if location == self.current() {
      return;
    }
    self.entries.truncate(self.cursor + 1);
    self.entries.push(location);
    self.cursor += 1;
  }

  pub fn replace(&mut self, location: impl Into<String>) {
    self.entries[self.cursor] = location.into();
  }

  pub fn back(&mut self) -> Option<&str> {
    if !self.can_go_back() {
      return None;
    }
    self.cursor -= 1;
    Some(self.current())
  }

  pub fn forward(&mut self) -> Option<&str> {
    if !self.can_go_forward() {
      return None;
    }
    self.cursor += 1;
    Some(self.current())
  }

  pub fn can_go_back(&self) -> bool {
    self.cursor > 0
  }

  pub fn can_go_forward(&self) -> bool {
    self.cursor + 1 < self.entries.len()
  }

  #[cfg(test)]
  pub fn len(&self) -> usize {
    self.entries.len()
  }
}
