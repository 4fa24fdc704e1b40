//! Sample members and books used by the seed binary and the in-memory store

use crate::models::{Book, Member};

pub fn members() -> Vec<Member> {
    vec![
        Member::new("M001", "Angga"),
        Member::new("M002", "Ferry"),
        Member::new("M003", "Putri"),
    ]
}

pub fn books() -> Vec<Book> {
    vec![
        Book::new("JK-45", "Harry Potter", 1),
        Book::new("SHR-1", "A Study in Scarlet", 1),
        Book::new("TW-11", "Twilight", 1),
        Book::new("HOB-83", "The Hobbit, or There and Back Again", 1),
        Book::new("NRN-7", "The Lion, the Witch and the Wardrobe", 1),
    ]
}
