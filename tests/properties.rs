//! Property tests for permutations and whole-machine reciprocity.

use std::sync::Arc;

use proptest::prelude::*;

use enigma::{Alphabet, Machine, MachineConfig, Permutation, Settings};

const ENIGMA_I_CONFIG: &str = "A-Z 4 3
UKWB  R    (AY) (BR) (CU) (DH) (EQ) (FS) (GL) (IP) (JX) (KN) (MO) (TZ) (VW)
I     MQ   (AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)
II    ME   (FIXVYOMW) (CDKLHUP) (ESZ) (BJ) (GR) (NT) (A) (Q)
III   MV   (ABDHPEJT) (CFLVMZOYQIRWUKXSG) (N)
";

/// Writes the mapping `i -> image[i]` over `A-Z` in cycle notation.
fn cycles_of(image: &[usize]) -> String {
    let alpha = Alphabet::uppercase();
    let mut seen = vec![false; image.len()];
    let mut out = String::new();
    for start in 0..image.len() {
        if seen[start] {
            continue;
        }
        out.push('(');
        let mut i = start;
        while !seen[i] {
            seen[i] = true;
            out.push(alpha.to_char(i).unwrap());
            i = image[i];
        }
        out.push(')');
    }
    out
}

fn machine(positions: &str, plugboard: &str) -> Machine {
    let config = MachineConfig::parse(ENIGMA_I_CONFIG).unwrap();
    let mut machine = config.build_machine().unwrap();
    Settings::parse(&format!("* UKWB I II III {} {}", positions, plugboard))
        .unwrap()
        .apply(&mut machine)
        .unwrap();
    machine
}

proptest! {
    #[test]
    fn permutation_matches_its_cycles(
        image in Just((0..26).collect::<Vec<usize>>()).prop_shuffle()
    ) {
        let alpha = Arc::new(Alphabet::uppercase());
        let perm = Permutation::new(&cycles_of(&image), alpha).unwrap();
        for (i, &target) in image.iter().enumerate() {
            prop_assert_eq!(perm.permute(i), target);
            prop_assert_eq!(perm.invert(target), i);
        }
        prop_assert_eq!(perm.derangement(), image.iter().enumerate().all(|(i, &t)| i != t));
    }

    #[test]
    fn canonical_form_reparses(
        image in Just((0..26).collect::<Vec<usize>>()).prop_shuffle()
    ) {
        let alpha = Arc::new(Alphabet::uppercase());
        let perm = Permutation::new(&cycles_of(&image), Arc::clone(&alpha)).unwrap();
        let again = Permutation::new(&perm.to_string(), alpha).unwrap();
        prop_assert_eq!(perm, again);
    }

    #[test]
    fn machine_is_self_reciprocal(
        message in "[A-Z ]{0,80}",
        positions in "[A-Z]{3}",
    ) {
        let plugboard = "(AQ) (EP) (KZ) (TM)";
        let ciphertext = machine(&positions, plugboard).convert_message(&message).unwrap();
        let plaintext = machine(&positions, plugboard).convert_message(&ciphertext).unwrap();
        prop_assert_eq!(plaintext, message);
    }

    #[test]
    fn no_symbol_encrypts_to_itself(
        message in "[A-Z]{1,80}",
        positions in "[A-Z]{3}",
    ) {
        let ciphertext = machine(&positions, "").convert_message(&message).unwrap();
        prop_assert_eq!(ciphertext.len(), message.len());
        for (plain, cipher) in message.chars().zip(ciphertext.chars()) {
            prop_assert_ne!(plain, cipher);
        }
    }

    #[test]
    fn fast_rotor_always_moves(positions in "[A-Z]{3}") {
        let mut m = machine(&positions, "");
        let before = m.positions();
        m.convert(0).unwrap();
        let after = m.positions();
        let fast_before = before.chars().last().unwrap() as u8;
        let fast_after = after.chars().last().unwrap() as u8;
        prop_assert_eq!((fast_before - b'A' + 1) % 26, fast_after - b'A');
    }
}
