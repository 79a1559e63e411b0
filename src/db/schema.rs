table! {
    companies (id) {
        id -> Integer,
        name -> Text,
        logo -> Nullable<Text>,
    }
}

table! {
    job_items (id) {
        id -> Integer,
        link -> Text,
        title -> Text,
        company_id -> Integer,
        published_at -> Timestamp,
        location -> Nullable<Text>,
        salary -> Nullable<Text>,
        applied_at -> Nullable<Timestamp>,
        deleted_at -> Nullable<Timestamp>,
    }
}

joinable!(job_items -> companies (company_id));

allow_tables_to_appear_in_same_query!(companies, job_items);
