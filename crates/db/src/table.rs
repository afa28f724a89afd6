use sea_query::Iden;

#[derive(Iden, Clone)]
pub enum User {
    Table,
    Id,
    Email,
    DisplayName,
    Password,
    Role,
    CreatedAt,
}

#[derive(Iden, Clone)]
pub enum Course {
    Table,
    Id,
    Title,
    Description,
    Duration,
    PriceCents,
    Modules,
    CreatedAt,
    UpdatedAt,
    ArchivedAt,
}

#[derive(Iden, Clone)]
pub enum Webinar {
    Table,
    Id,
    Title,
    Description,
    Duration,
    PriceCents,
    Platform,
    StartsAt,
    CreatedAt,
    UpdatedAt,
    ArchivedAt,
}

#[derive(Iden, Clone)]
pub enum Registration {
    Table,
    Id,
    Kind,
    EntityId,
    UserId,
    CreatedAt,
    RecordedAt,
}

#[derive(Iden, Clone)]
pub enum CommunityPost {
    Table,
    Id,
    AuthorId,
    AuthorName,
    Body,
    CreatedAt,
}

#[derive(Iden, Clone)]
pub enum Feedback {
    Table,
    Id,
    UserId,
    AuthorName,
    Kind,
    EntityId,
    Rating,
    Title,
    Content,
    Verified,
    Status,
    ModerationNotes,
    ModeratedBy,
    ModeratedAt,
    Response,
    RespondedBy,
    RespondedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden, Clone)]
pub enum Question {
    Table,
    Id,
    UserId,
    AuthorName,
    Title,
    Content,
    Kind,
    EntityId,
    Status,
    ResolutionNotes,
    FirstResponseAt,
    ResolvedAt,
    ClosedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden, Clone)]
pub enum QuestionReply {
    Table,
    Id,
    QuestionId,
    AdminId,
    AdminName,
    Body,
    Kind,
    CreatedAt,
}
