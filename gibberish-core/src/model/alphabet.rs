/// Ordered symbols the model knows about: `a` to `z` followed by space.
///
/// A symbol's position in this table is its row/column index in every
/// transition matrix.
pub const ALPHABET: [char; ALPHABET_SIZE] = [
	'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm',
	'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z', ' ',
];

/// Number of symbols in [`ALPHABET`].
pub const ALPHABET_SIZE: usize = 27;

/// Returns the matrix index of `c`, or `None` if `c` is not in the alphabet.
pub fn index_of(c: char) -> Option<usize> {
	match c {
		'a'..='z' => Some(c as usize - 'a' as usize),
		' ' => Some(ALPHABET_SIZE - 1),
		_ => None,
	}
}

/// Lowercases `line` and drops every character outside the alphabet.
///
/// The result may be empty. Applying it twice is the same as applying it once.
pub fn normalize(line: &str) -> String {
	symbols(line).map(|i| ALPHABET[i]).collect()
}

/// Iterates the alphabet indices of the normalized form of `line`.
///
/// This is the single place where raw text becomes matrix indices: anything
/// it yields is in `0..ALPHABET_SIZE`.
pub(crate) fn symbols(line: &str) -> impl Iterator<Item = usize> + '_ {
	line.chars().flat_map(char::to_lowercase).filter_map(index_of)
}

/// Iterates consecutive `(from, to)` index pairs of the normalized `line`.
pub(crate) fn transitions(line: &str) -> impl Iterator<Item = (usize, usize)> + '_ {
	let mut previous = None;
	symbols(line).filter_map(move |current| {
		let pair = previous.map(|from| (from, current));
		previous = Some(current);
		pair
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn table_and_index_agree() {
		for (i, c) in ALPHABET.iter().enumerate() {
			assert_eq!(index_of(*c), Some(i));
		}
		assert_eq!(index_of('A'), None);
		assert_eq!(index_of('1'), None);
	}

	#[test]
	fn normalize_lowercases_and_filters() {
		assert_eq!(normalize("Hello, World! 42"), "hello world ");
		assert_eq!(normalize("\tTabs\nand-dashes"), "tabsanddashes");
		assert_eq!(normalize("Ça va? Ünïcödé"), "a va ncd");
		assert_eq!(normalize(""), "");
		assert_eq!(normalize("1234!?"), "");
	}

	#[test]
	fn transitions_walk_pairs() {
		let pairs: Vec<_> = transitions("Ab c").collect();
		assert_eq!(pairs, vec![(0, 1), (1, 26), (26, 2)]);
		assert_eq!(transitions("a").count(), 0);
		assert_eq!(transitions("").count(), 0);
	}
}
