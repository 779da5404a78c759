//! Prompt templates for the insight endpoints. Placeholders are substituted
//! with `.replace()` before the call; every prompt demands bare JSON.

pub const CAREER_GUIDE_SYSTEM: &str = "You are a career advisor. Respond with pure JSON only — no prose, no markdown fences, no extra characters.";

pub const CAREER_GUIDE_PROMPT: &str = r#"Create a comprehensive career guide for a {job_title} role. Be specific to this role and provide detailed, practical information.

Return a JSON object with the following structure:
{
    "roleOverview": "Detailed description specific to {job_title}, including day-to-day responsibilities, career progression, and industry impact",
    "technicalSkills": [
        {"category": "Core Skills for {job_title}", "tools": ["specific tools and technologies required"]},
        {"category": "Additional Technical Skills", "tools": ["complementary skills that would be valuable"]},
        {"category": "Emerging Technologies", "tools": ["new technologies relevant to this role"]}
    ],
    "softSkills": ["5-7 soft skills specifically important for {job_title}, with brief explanations"],
    "certifications": [
        {"name": "Certification name specific to {job_title}", "provider": "Certification provider", "level": "Difficulty level", "description": "Why this certification is valuable"}
    ],
    "projectIdeas": [
        {"title": "Project name relevant to {job_title}", "description": "Detailed project description showing relevant skills", "technologies": ["required technologies"], "learningOutcomes": ["what you will learn"]}
    ],
    "industryTrends": ["5 current trends specifically affecting {job_title} roles"],
    "salaryRange": {
        "entry": "Entry-level salary range for {job_title}",
        "mid": "Mid-level salary range for {job_title}",
        "senior": "Senior-level salary range for {job_title}",
        "factors": ["factors that affect salary in this role"]
    },
    "learningResources": [
        {"name": "Resource name specific to {job_title}", "type": "Course/Book/Tutorial/Workshop", "cost": "Free/Paid with approximate cost", "url": "Resource URL", "duration": "Estimated time to complete", "description": "What you will learn"}
    ],
    "prerequisites": {
        "education": ["required/recommended education"],
        "experience": ["required/recommended experience"],
        "skills": ["must-have skills before starting"]
    },
    "careerPath": {
        "entryLevel": "Entry-level positions",
        "midLevel": "Mid-level positions",
        "senior": "Senior-level positions",
        "advancement": ["possible career advancement paths"]
    }
}

Ensure all information is specific to the {job_title} role, current, detailed, and realistic."#;

pub const RESUME_PARSE_SYSTEM: &str = "You extract structured data from resume text. Respond with pure JSON only — no extra characters or formatting.";

pub const RESUME_PARSE_PROMPT: &str = r#"Parse this resume text and extract key information in JSON format:

{resume_text}

Return format:
{
    "skills": ["skill1", "skill2"],
    "experience": ["exp1", "exp2"],
    "education": ["edu1", "edu2"],
    "certifications": ["cert1", "cert2"]
}"#;

pub const RESUME_COMPARE_SYSTEM: &str = "You compare resumes against job requirements. Respond with pure JSON only.";

pub const RESUME_COMPARE_PROMPT: &str = r#"Compare this resume with the job requirements and provide a detailed analysis:
Resume: {resume}
Job Requirements: {job_insights}

Return a JSON object with the following structure:
{
    "overallMatch": percentage,
    "matchingSkills": ["skill1", "skill2"],
    "missingSkills": ["skill1", "skill2"],
    "recommendations": ["rec1", "rec2"]
}"#;
