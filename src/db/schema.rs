//! Database schema definitions for Diesel.

diesel::table! {
    tracks (id) {
        id -> Integer,
        title -> Text,
        artist -> Nullable<Text>,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

diesel::table! {
    lyric_lines (id) {
        id -> Integer,
        track_id -> Integer,
        position -> Integer,
        offset_cs -> Integer,
        text -> Text,
    }
}

diesel::joinable!(lyric_lines -> tracks (track_id));

diesel::allow_tables_to_appear_in_same_query!(tracks, lyric_lines);
