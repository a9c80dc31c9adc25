use arche_schedule::MappingSolution;

/// A mapping solution along with the file it was read from.
#[derive(Debug)]
pub struct Design {
    pub file: String,
    pub solution: MappingSolution,
}

/// The designs loaded so far. The most recently loaded one is the one acted upon.
#[derive(Debug, Default)]
pub struct Session {
    designs: Vec<Design>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, design: Design) {
        self.designs.push(design);
    }

    pub fn current(&self) -> Option<&Design> {
        self.designs.last()
    }

    pub fn len(&self) -> usize {
        self.designs.len()
    }
}
