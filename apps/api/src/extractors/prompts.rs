// Prompt templates for the structuring calls made by the extractors.
// Placeholders are replaced with `str::replace` before sending.

/// DevPost profile structuring. Replace `{page_text}` and `{image_info}`.
pub const DEVPOST_STRUCTURE_TEMPLATE: &str = r#"Extract and structure the following DevPost profile information into JSON format.

Raw text content from the DevPost profile page:
{page_text}

{image_info}

Return a JSON object with this EXACT schema:
{
    "name": "Full name of the person",
    "location": "Location if available",
    "bio": "Bio or description if available",
    "skills": ["skill1", "skill2"],
    "interests": ["interest1", "interest2"],
    "stats": {
        "projects": 0,
        "hackathons": 0,
        "achievements": 0,
        "followers": 0,
        "following": 0
    },
    "projects": [
        {
            "name": "Project name",
            "description": "Project description",
            "technologies": ["tech1", "tech2"],
            "awards": ["award info if any"]
        }
    ],
    "linkedin_url": "LinkedIn URL if present, else null"
}

Use empty strings, empty arrays, and zeros for anything not present.
Return ONLY valid JSON, no additional text or markdown formatting."#;

/// Kaggle profile page structuring. Replace `{page_text}`.
pub const KAGGLE_PROFILE_TEMPLATE: &str = r#"Extract Kaggle profile information from the following text:

{page_text}

Return a JSON object with this EXACT schema:
{
    "name": "Full name",
    "bio": "Bio or description",
    "location": "Location if available",
    "occupation": "Occupation if available",
    "organization": "Organization if available",
    "competitions": {
        "tier": "Competition tier (Novice, Contributor, Expert, Master, Grandmaster)",
        "medals": {"gold": 0, "silver": 0, "bronze": 0},
        "total": 0
    },
    "datasets": {"tier": "Dataset tier", "total": 0},
    "notebooks": {"tier": "Notebook tier", "total": 0},
    "discussion": {"tier": "Discussion tier", "total": 0},
    "followers": 0,
    "following": 0
}

Use empty strings and zeros for anything not present.
Return ONLY valid JSON, no markdown formatting."#;

/// Kaggle code/notebooks page structuring. Replace `{page_text}`.
pub const KAGGLE_CODE_TEMPLATE: &str = r#"Extract Kaggle notebooks/code information from:

{page_text}

Return a JSON array of notebooks:
[
    {
        "title": "Notebook title",
        "description": "Description",
        "language": "Python or R",
        "votes": 0,
        "views": 0,
        "last_run": "Last run date if available"
    }
]

Return ONLY a valid JSON array, no markdown formatting."#;

/// Kaggle datasets page structuring. Replace `{page_text}`.
pub const KAGGLE_DATASETS_TEMPLATE: &str = r#"Extract Kaggle datasets information from:

{page_text}

Return a JSON array of datasets:
[
    {
        "title": "Dataset title",
        "description": "Description",
        "size": "Dataset size",
        "files": 0,
        "downloads": 0,
        "votes": 0,
        "usability": 0.0
    }
]

Return ONLY a valid JSON array, no markdown formatting."#;

/// Unknown-website classify-and-summarize call.
/// Replace `{url}`, `{page_title}`, `{meta_description}`, `{page_text}`.
pub const WEBSITE_ANALYZE_TEMPLATE: &str = r#"Analyze the following website content and provide a comprehensive summary.

Website URL: {url}
Page Title: {page_title}
Meta Description: {meta_description}

Website Content:
{page_text}

Return a JSON object with this EXACT schema:
{
    "page_type": "Type of page (e.g., 'Portfolio', 'Blog', 'Company Website', 'Project Page', 'Profile', 'Article', 'Documentation', 'Other')",
    "category": "Category (e.g., 'Professional Profile', 'Technical Blog', 'E-commerce', 'Educational')",
    "summary": "A comprehensive 2-3 paragraph summary of what this page is about, its purpose, and key information",
    "key_topics": ["topic1", "topic2"],
    "technologies_mentioned": ["tech1", "tech2"],
    "skills_demonstrated": ["skill1", "skill2"],
    "projects_mentioned": [
        {"name": "Project name", "description": "Brief description"}
    ],
    "contact_info": {
        "email": "email if found",
        "social_links": ["link1", "link2"]
    },
    "main_content": "The main message or purpose of this page in 1-2 sentences",
    "professional_relevance": "How this page relates to the person's professional profile"
}

Return ONLY valid JSON, no markdown formatting or additional text."#;
