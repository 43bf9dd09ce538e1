#![no_main]
use libfuzzer_sys::fuzz_target;
use rookery::chess::game::GameState;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(game) = GameState::try_from(s) {
            // Printing the position back and parsing it gives the same game.
            let printed = game.to_string();
            assert_eq!(GameState::from_fen(&printed).unwrap(), game);
        }
    }
});
