//! Sample library the service starts with.

use jiff::civil::date;
use uuid::Uuid;

use crate::models::{Author, Book};
use crate::repositories::InMemoryLibraryRepository;

fn author(id: u128, first: &str, last: &str, born: (i16, i8, i8), genre: &str) -> Author {
    Author {
        id: Uuid::from_u128(id),
        first_name: first.to_string(),
        last_name: last.to_string(),
        date_of_birth: date(born.0, born.1, born.2),
        genre: genre.to_string(),
    }
}

fn book(id: u128, author_id: u128, title: &str, description: &str) -> Book {
    Book {
        id: Uuid::from_u128(id),
        author_id: Uuid::from_u128(author_id),
        title: title.to_string(),
        description: Some(description.to_string()),
    }
}

/// A repository holding six authors and their books, with fixed ids.
pub fn seed_library() -> InMemoryLibraryRepository {
    let authors = vec![
        author(0x25320c5e_f58a_4b1f_b63a_8ee07a840bdf, "Stephen", "King", (1947, 9, 21), "Horror"),
        author(0x76053df4_6687_4353_8937_b45556748abe, "George", "RR Martin", (1948, 9, 20), "Fantasy"),
        author(0x412c3012_d891_4f5e_9613_ff7aa63e6bb3, "Neil", "Gaiman", (1960, 11, 10), "Fantasy"),
        author(0x578359b7_1967_41d6_8b87_64ab7605587e, "Tom", "Lanoye", (1958, 8, 27), "Various"),
        author(0xf74d6899_9ed2_4137_9876_66b070553f8f, "Douglas", "Adams", (1952, 3, 11), "Science Fiction"),
        author(0xa1da1d8e_1988_4634_b538_a01709477b77, "Jens", "Lapidus", (1974, 5, 24), "Thriller"),
    ];

    let books = vec![
        book(0xc7ba6add_09c4_45f8_8dd0_eaca221e5d93, 0x25320c5e_f58a_4b1f_b63a_8ee07a840bdf, "The Shining",
            "The Shining is a horror novel by American author Stephen King."),
        book(0xa3749477_f823_4124_aa4a_fc9ad5e79cd6, 0x25320c5e_f58a_4b1f_b63a_8ee07a840bdf, "Misery",
            "Misery is a psychological horror thriller novel by Stephen King."),
        book(0x70a1f9b9_0a37_4c1a_99b1_c7709fc64167, 0x25320c5e_f58a_4b1f_b63a_8ee07a840bdf, "It",
            "It is a horror novel by American author Stephen King."),
        book(0x60188a2b_2784_4fc4_8df8_8919ff838b0b, 0x25320c5e_f58a_4b1f_b63a_8ee07a840bdf, "The Stand",
            "The Stand is a post-apocalyptic horror/fantasy novel by Stephen King."),
        book(0x447eb762_95e9_4c31_95e1_b20053fbe215, 0x76053df4_6687_4353_8937_b45556748abe, "A Game of Thrones",
            "A Game of Thrones is the first novel in A Song of Ice and Fire."),
        book(0xbc4c35c3_3857_4250_9449_155fcf5109ec, 0x76053df4_6687_4353_8937_b45556748abe, "The Winds of Winter",
            "Forthcoming 6th novel in A Song of Ice and Fire."),
        book(0x09af5a52_9421_44e8_a2bb_a6b9ccbc8239, 0x76053df4_6687_4353_8937_b45556748abe, "A Dance with Dragons",
            "A Dance with Dragons is the fifth of seven planned novels in A Song of Ice and Fire."),
        book(0x9edf91ee_ab77_4521_a402_5f188bc0c577, 0x412c3012_d891_4f5e_9613_ff7aa63e6bb3, "American Gods",
            "American Gods is a Hugo and Nebula Award-winning novel by Neil Gaiman."),
        book(0x01457142_358f_495f_aafa_fb23de3d67e9, 0x578359b7_1967_41d6_8b87_64ab7605587e, "Speechless",
            "Good-natured and often humorous, Speechless is a portrait of the author's mother."),
        book(0xe57b605f_8b3c_4089_b672_6ce9e6d6c23f, 0xf74d6899_9ed2_4137_9876_66b070553f8f, "The Hitchhiker's Guide to the Galaxy",
            "The first book in the comedy science fiction series by Douglas Adams."),
        book(0x1325360c_8253_473a_a20f_55c269c20407, 0xa1da1d8e_1988_4634_b538_a01709477b77, "Easy Money",
            "Easy Money or Snabba cash is a novel from 2006 by Jens Lapidus."),
    ];

    tracing::info!(authors = authors.len(), books = books.len(), "Seeding in-memory library");
    InMemoryLibraryRepository::with_data(authors, books)
}
