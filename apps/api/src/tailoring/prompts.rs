// All LLM prompt constants for resume tailoring.

/// Analysis prompt template.
/// Replace: {resume_text}, {jd_text}
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"You are an AI resume expert. Analyze the provided resume and job description, and provide suggestions on how to improve the resume to better align with the job description. Focus on skills, experience, and keywords.

Resume:
{resume_text}

Job Description:
{jd_text}

Return only the analysis as a plain text string."#;

/// Improvement prompt template.
/// Replace: {json_schema}, {resume_text}, {jd_text}, {analysis}
pub const IMPROVEMENT_PROMPT_TEMPLATE: &str = r#"You are an expert resume writer and data extraction specialist. Rewrite the "Original Resume" so it is better tailored to the "Job Description", using the "AI Analysis" as a guide. Output the result as a single, valid JSON object that strictly conforms to the "JSON Schema".

Instructions:
1. The output MUST be a single, valid JSON object wrapped in ```json ... ``` markdown fences. Do not include any text outside the JSON object.
2. Rewrite the resume content, focusing on the summary and experience sections to align them with the target job.
3. Incorporate keywords and skills from the job description where appropriate.
4. Keep every section of the original resume (contact info, education, projects, etc.) in the output.
5. For the 'responsibilities' of each 'experience' item, output a JSON array of strings, one bullet point per string.
6. For the 'skills' field, output a structured string. Example: "Languages: Java, Kotlin; Frameworks: React, Next.js".
7. If a required field from the schema is missing from the resume text (like 'email'), create a realistic placeholder.

JSON Schema to follow:
```json
{json_schema}
```

Original Resume:
{resume_text}

Job Description:
{jd_text}

AI Analysis:
{analysis}"#;

/// JSON shape of a resume record, given to the model as the output contract.
pub const RESUME_JSON_SCHEMA: &str = r#"{
  "type": "object",
  "required": ["fullName", "email", "phone", "summary", "experience", "education", "skills"],
  "properties": {
    "fullName": {"type": "string"},
    "email": {"type": "string"},
    "phone": {"type": "string"},
    "location": {"type": "string"},
    "website": {"type": "string"},
    "linkedin": {"type": "string"},
    "github": {"type": "string"},
    "summary": {"type": "string"},
    "experience": {
      "type": "array",
      "minItems": 1,
      "items": {
        "type": "object",
        "required": ["company", "location", "title", "startDate", "endDate", "responsibilities"],
        "properties": {
          "company": {"type": "string"},
          "location": {"type": "string"},
          "title": {"type": "string"},
          "startDate": {"type": "string"},
          "endDate": {"type": "string"},
          "responsibilities": {"type": "array", "minItems": 1, "items": {"type": "string"}}
        }
      }
    },
    "projects": {
      "type": "array",
      "items": {
        "type": "object",
        "required": ["name", "description"],
        "properties": {
          "name": {"type": "string"},
          "description": {"type": "string"},
          "technologies": {"type": "string"},
          "url": {"type": "string"}
        }
      }
    },
    "education": {
      "type": "array",
      "minItems": 1,
      "items": {
        "type": "object",
        "required": ["institution", "location", "degree", "graduationDate"],
        "properties": {
          "institution": {"type": "string"},
          "location": {"type": "string"},
          "degree": {"type": "string"},
          "graduationDate": {"type": "string"}
        }
      }
    },
    "certifications": {
      "type": "array",
      "items": {
        "type": "object",
        "required": ["name"],
        "properties": {
          "name": {"type": "string"},
          "issuer": {"type": "string"},
          "date": {"type": "string"},
          "url": {"type": "string"}
        }
      }
    },
    "skills": {"type": "string"}
  }
}"#;

pub fn analysis_prompt(resume_text: &str, jd_text: &str) -> String {
    ANALYSIS_PROMPT_TEMPLATE
        .replace("{resume_text}", resume_text)
        .replace("{jd_text}", jd_text)
}

pub fn improvement_prompt(resume_text: &str, jd_text: &str, analysis: &str) -> String {
    IMPROVEMENT_PROMPT_TEMPLATE
        .replace("{json_schema}", RESUME_JSON_SCHEMA)
        .replace("{resume_text}", resume_text)
        .replace("{jd_text}", jd_text)
        .replace("{analysis}", analysis)
}
