use crate::core::contig::Contig;

/// Densely indexed set of contigs
///
/// Indices always run `0..len()`; removing a contig shifts every later
/// contig down by one. Structural changes need `&mut self`, which the
/// extension rounds hold for their whole duration, so the enumeration seen by
/// workers never changes underneath them.
#[derive(Debug, Default, Clone)]
pub struct ContigCollection {
    contigs: Vec<Contig>,
}

impl ContigCollection {
    pub fn new(contigs: Vec<Contig>) -> Self {
        Self { contigs }
    }

    pub fn len(&self) -> usize {
        self.contigs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contigs.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Contig> {
        self.contigs.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Contig> {
        self.contigs.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Contig> {
        self.contigs.iter()
    }

    /// All contigs as one mutable slice, for a worker round
    pub fn as_mut_slice(&mut self) -> &mut [Contig] {
        &mut self.contigs
    }

    /// Remove the contig at `index`, compacting later indices
    pub fn remove(&mut self, index: usize) -> Contig {
        self.contigs.remove(index)
    }

    /// Append `tail` to the contig at `keep` and remove the contig at `absorbed`
    ///
    /// Returns the index of the kept contig after compaction.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds or they are equal.
    pub fn fuse(&mut self, keep: usize, absorbed: usize, tail: &[u8]) -> usize {
        assert_ne!(keep, absorbed, "a contig cannot be fused with itself");
        self.contigs[keep].append_fused(tail);
        self.contigs.remove(absorbed);
        if absorbed < keep {
            keep - 1
        } else {
            keep
        }
    }

    /// Drop contigs left without any sequence; returns how many were removed
    pub fn remove_empty(&mut self) -> usize {
        let before = self.contigs.len();
        self.contigs.retain(|c| !c.is_empty());
        before - self.contigs.len()
    }

    pub fn total_length(&self) -> usize {
        self.contigs.iter().map(Contig::len).sum()
    }
}

impl From<Vec<Contig>> for ContigCollection {
    fn from(contigs: Vec<Contig>) -> Self {
        Self::new(contigs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembly::config::ExtensionParams;

    fn collection(seqs: &[&str]) -> ContigCollection {
        let params = ExtensionParams::default();
        seqs.iter()
            .enumerate()
            .map(|(i, s)| Contig::new(format!("contig_{i}"), s.as_bytes(), &params))
            .collect::<Vec<_>>()
            .into()
    }

    fn names(c: &ContigCollection) -> Vec<&str> {
        c.iter().map(Contig::name).collect()
    }

    #[test]
    fn test_remove_compacts_indices() {
        let mut c = collection(&["AAAA", "CCCC", "GGGG"]);
        let removed = c.remove(1);
        assert_eq!(removed.name(), "contig_1");
        assert_eq!(c.len(), 2);
        assert_eq!(names(&c), vec!["contig_0", "contig_2"]);
        assert_eq!(c.get(1).unwrap().sequence(), b"GGGG");
        assert!(c.get(2).is_none());
    }

    #[test]
    fn test_fuse_keep_before_absorbed() {
        let mut c = collection(&["AAAACCCC", "TTTT", "CCCCGGGG"]);
        let kept = c.fuse(0, 2, b"GGGG");
        assert_eq!(kept, 0);
        assert_eq!(c.len(), 2);
        assert_eq!(c.get(0).unwrap().sequence(), b"AAAACCCCGGGG");
        assert_eq!(c.get(1).unwrap().sequence(), b"TTTT");
    }

    #[test]
    fn test_fuse_keep_after_absorbed() {
        let mut c = collection(&["CCCCGGGG", "TTTT", "AAAACCCC"]);
        let kept = c.fuse(2, 0, b"GGGG");
        assert_eq!(kept, 1);
        assert_eq!(names(&c), vec!["contig_1", "contig_2"]);
        assert_eq!(c.get(1).unwrap().sequence(), b"AAAACCCCGGGG");
    }

    #[test]
    fn test_remove_empty_and_total_length() {
        let mut c = collection(&["ACGT", "", "AC"]);
        assert_eq!(c.total_length(), 6);
        assert_eq!(c.remove_empty(), 1);
        assert_eq!(names(&c), vec!["contig_0", "contig_2"]);
    }
}
