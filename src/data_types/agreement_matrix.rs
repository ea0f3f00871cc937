use crate::data_types::alignment_record::AlignmentRecord;

/// Symmetric N x N matrix of which tools agree on where a single read belongs.
/// The diagonal is always true since a tool trivially agrees with itself.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AgreementMatrix {
    /// Number of tools, i.e. the row length
    num_tools: usize,
    /// Row-major storage
    agreements: Vec<bool>
}

impl AgreementMatrix {
    /// Builds the matrix by comparing every unordered pair of alignments once and mirroring the result.
    /// # Arguments
    /// * `records` - one alignment per tool, in tool order
    /// * `wiggle` - exclusive upper bound on the position difference between agreeing alignments
    pub fn build(records: &[&AlignmentRecord], wiggle: u64) -> Self {
        let num_tools = records.len();
        let mut matrix = Self {
            num_tools,
            agreements: vec![false; num_tools * num_tools]
        };

        for (i, r1) in records.iter().enumerate() {
            matrix.set(i, i, true);
            for (j, r2) in records.iter().enumerate().skip(i + 1) {
                let same = r1.same_locus(r2, wiggle);
                matrix.set(i, j, same);
                matrix.set(j, i, same);
            }
        }
        matrix
    }

    /// Creates a matrix from explicit rows.
    /// # Errors
    /// * if the rows do not form a square
    /// * if the diagonal is not all true
    /// * if the matrix is not symmetric
    pub fn from_rows(rows: &[Vec<bool>]) -> anyhow::Result<Self> {
        let num_tools = rows.len();
        anyhow::ensure!(rows.iter().all(|r| r.len() == num_tools), "Agreement matrix must be square");
        let matrix = Self {
            num_tools,
            agreements: rows.concat()
        };
        for i in 0..num_tools {
            anyhow::ensure!(matrix.get(i, i), "Agreement matrix diagonal must be true, row {i} is not");
            for j in (i + 1)..num_tools {
                anyhow::ensure!(matrix.get(i, j) == matrix.get(j, i), "Agreement matrix is not symmetric at ({i}, {j})");
            }
        }
        Ok(matrix)
    }

    fn set(&mut self, i: usize, j: usize, value: bool) {
        self.agreements[i * self.num_tools + j] = value;
    }

    /// Returns true if tool `i` and tool `j` agree
    pub fn get(&self, i: usize, j: usize) -> bool {
        self.agreements[i * self.num_tools + j]
    }

    /// Returns the full agreement row for tool `i`
    pub fn row(&self, i: usize) -> &[bool] {
        &self.agreements[i * self.num_tools..(i + 1) * self.num_tools]
    }

    /// Counts the agreements in row `i` that fall within the provided set of columns
    pub fn count_in(&self, i: usize, columns: &[usize]) -> usize {
        let row = self.row(i);
        columns.iter().filter(|&&j| row[j]).count()
    }

    /// Counts all the agreements in row `i`, including the diagonal
    pub fn count_row(&self, i: usize) -> usize {
        self.row(i).iter().filter(|&&b| b).count()
    }

    /// Number of tools agreeing with each tool's alignment, including itself
    pub fn agreement_counts(&self) -> Vec<usize> {
        (0..self.num_tools).map(|i| self.count_row(i)).collect()
    }

    pub fn num_tools(&self) -> usize {
        self.num_tools
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_types::score::Score;

    fn records_at(positions: &[i64]) -> Vec<AlignmentRecord> {
        positions.iter()
            .map(|&p| AlignmentRecord::new("1".to_string(), p, 41, 27, Score::parse("40.752").unwrap()))
            .collect()
    }

    fn build(records: &[AlignmentRecord], wiggle: u64) -> AgreementMatrix {
        let refs: Vec<&AlignmentRecord> = records.iter().collect();
        AgreementMatrix::build(&refs, wiggle)
    }

    #[test]
    fn test_agreement_counts_three() {
        let records = records_at(&[1639199, 1639728, 1639728]);
        assert_eq!(build(&records, 10).agreement_counts(), vec![1, 2, 2]);
        assert_eq!(build(&records, 1000).agreement_counts(), vec![3, 3, 3]);
    }

    #[test]
    fn test_agreement_counts_five() {
        let records = records_at(&[1639199, 1639728, 1639728, 1649728, 1649728]);
        assert_eq!(build(&records, 10).agreement_counts(), vec![1, 2, 2, 2, 2]);
        assert_eq!(build(&records, 1000).agreement_counts(), vec![3, 3, 3, 2, 2]);
        assert_eq!(build(&records, 20000).agreement_counts(), vec![5, 5, 5, 5, 5]);
    }

    #[test]
    fn test_matrix_values() {
        let records = records_at(&[1639199, 1639728, 1639728]);
        let expected = AgreementMatrix::from_rows(&[
            vec![true, false, false],
            vec![false, true, true],
            vec![false, true, true]
        ]).unwrap();
        assert_eq!(build(&records, 10), expected);

        let expected = AgreementMatrix::from_rows(&[
            vec![true, true, true],
            vec![true, true, true],
            vec![true, true, true]
        ]).unwrap();
        assert_eq!(build(&records, 1000), expected);
    }

    #[test]
    fn test_diagonal_and_symmetry() {
        let mut records = records_at(&[5, 15, 25, 1000, 1009]);
        records.push(AlignmentRecord::new("2".to_string(), 5, 0, 0, Score::from_int(0)));
        for wiggle in [0, 1, 10, 11, 995, 100000] {
            let matrix = build(&records, wiggle);
            for i in 0..records.len() {
                assert!(matrix.get(i, i));
                for j in 0..records.len() {
                    assert_eq!(matrix.get(i, j), matrix.get(j, i));
                }
            }
        }
    }

    #[test]
    fn test_from_rows_errors() {
        assert!(AgreementMatrix::from_rows(&[vec![true, false]]).is_err());
        assert!(AgreementMatrix::from_rows(&[vec![false]]).is_err());
        assert!(AgreementMatrix::from_rows(&[vec![true, true], vec![false, true]]).is_err());
    }

    #[test]
    fn test_count_in() {
        let matrix = AgreementMatrix::from_rows(&[
            vec![true, false, true],
            vec![false, true, true],
            vec![true, true, true]
        ]).unwrap();
        assert_eq!(matrix.count_in(2, &[0, 1]), 2);
        assert_eq!(matrix.count_in(0, &[1]), 0);
        assert_eq!(matrix.count_in(0, &[]), 0);
        assert_eq!(matrix.count_row(1), 2);
    }
}
